#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use stride_core::strategies::{Pid, PseudoRkqs, Scaled};
use stride_core::{DynStepper, StepStatus, Stepper, Strategy};

#[derive(Debug, Arbitrary)]
enum Kind {
    Scaled,
    Pid,
    Rkqs,
}

#[derive(Debug, Arbitrary)]
struct Walk {
    kind: Kind,
    stop: u16,
    record: bool,
    errors: Vec<u8>,
}

fuzz_target!(|walk: Walk| {
    let strategy: Box<dyn Strategy + Send> = match walk.kind {
        Kind::Scaled => Box::new(Scaled::default()),
        Kind::Pid => Box::new(Pid::default()),
        Kind::Rkqs => Box::new(PseudoRkqs::default()),
    };
    let stop = f64::from(walk.stop) + 1.0;
    let mut stepper: DynStepper = match Stepper::builder(strategy)
        .with_range(0.0, stop)
        .with_record(walk.record)
        .with_min_step(1e-3)
        .build()
    {
        Ok(s) => s,
        Err(_) => return,
    };

    let mut last = 0.0;
    for &e in &walk.errors {
        let step = match stepper.next_step() {
            Ok(StepStatus::Next(step)) => step,
            Ok(StepStatus::Complete) | Err(_) => break,
        };
        assert_eq!(step.begin(), last);
        assert!(step.end() <= stop);
        let end = step.end();
        // 0..=255 maps onto errors in [0, 2.55]
        if step.succeeded(None, Some(f64::from(e) / 100.0)).is_success() {
            last = end;
        }
        assert_eq!(stepper.current(), last);
    }
});
