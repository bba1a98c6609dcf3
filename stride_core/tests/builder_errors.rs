use rstest::rstest;
use stride_core::error::BuildError;
use stride_core::strategies::{Checkpoints, Fixed, Pid, PseudoRkqs, Scaled};
use stride_core::{StepStatus, Stepper, Strategy};

#[rstest]
fn builder_missing_range_yields_typed_build_error() {
    let err = Stepper::builder(Fixed)
        // missing with_range()
        .with_size(1.0)
        .try_build()
        .expect_err("should fail with MissingRange");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingRange) => {}
        other => panic!("expected MissingRange, got: {other:?}"),
    }
}

#[rstest]
#[case::infinite_start(f64::INFINITY, 1.0, None, None)]
#[case::nan_start(f64::NAN, 1.0, None, None)]
#[case::nan_stop(0.0, f64::NAN, None, None)]
#[case::zero_size(0.0, 1.0, Some(0.0), None)]
#[case::infinite_size(0.0, 1.0, Some(f64::INFINITY), None)]
#[case::negative_min_step(0.0, 1.0, None, Some(-1e-3))]
#[case::nan_min_step(0.0, 1.0, None, Some(f64::NAN))]
fn builder_rejects_invalid_values(
    #[case] start: f64,
    #[case] stop: f64,
    #[case] size: Option<f64>,
    #[case] min_step: Option<f64>,
) {
    let mut b = Stepper::builder(Fixed).with_range(start, stop);
    if let Some(size) = size {
        b = b.with_size(size);
    }
    if let Some(min_step) = min_step {
        b = b.with_min_step(min_step);
    }
    let err = b.build().expect_err("should be rejected");
    assert!(
        matches!(err.downcast_ref::<BuildError>(), Some(BuildError::InvalidConfig(_))),
        "got {err:?}"
    );
}

#[test]
fn strategy_defaults_fill_unset_options() {
    let s = Stepper::builder(Pid::default())
        .with_range(0.0, 10.0)
        .build()
        .unwrap();
    assert!(s.is_limiting());
    assert_eq!(s.needs(), 3);
    assert_eq!(s.history().len(), 3);
    assert_eq!(s.min_step(), 10.0 * f64::EPSILON);

    let s = Stepper::builder(PseudoRkqs::default())
        .with_range(0.0, 10.0)
        .with_limiting(false)
        .with_min_step(0.5)
        .build()
        .unwrap();
    assert!(!s.is_limiting());
    assert_eq!(s.min_step(), 0.5);
}

#[test]
fn unset_size_spans_the_range() {
    let mut s = Stepper::builder(Fixed).with_range(2.0, 5.0).build().unwrap();
    let StepStatus::Next(step) = s.next_step().unwrap() else {
        panic!("expected a step");
    };
    assert_eq!((step.begin(), step.end()), (2.0, 5.0));
}

#[test]
fn checkpoints_suggest_the_first_stop() {
    let mut strategy = Checkpoints::new(vec![4.0, 9.0]).unwrap();
    assert_eq!(strategy.suggested_size(1.0), Some(3.0));
    let s = Stepper::builder(strategy)
        .with_range(1.0, f64::INFINITY)
        .build()
        .unwrap();
    assert_eq!(s.history().back(1).map(|a| a.size), Some(3.0));
    assert!(s.min_step() > 0.0);
}

#[rstest]
#[case::scaled_without_limiting(Box::new(Scaled::default()), false)]
#[case::fixed_with_limiting(Box::new(Fixed), true)]
#[case::checkpoints_with_limiting(Box::new(Checkpoints::new(vec![1.0]).unwrap()), true)]
fn contradicting_a_pinned_limiting_flag_is_rejected(
    #[case] strategy: Box<dyn Strategy + Send>,
    #[case] limiting: bool,
) {
    let err = Stepper::builder(strategy)
        .with_range(0.0, 10.0)
        .with_limiting(limiting)
        .build()
        .expect_err("should be rejected");
    assert_eq!(
        err.downcast_ref::<BuildError>(),
        Some(&BuildError::InvalidConfig("limiting flag contradicts the strategy"))
    );
}

#[test]
fn pinned_limiting_is_reported() {
    let scaled = Stepper::builder(Scaled::default())
        .with_range(0.0, 10.0)
        .with_limiting(true)
        .build()
        .unwrap();
    assert!(scaled.is_limiting());
    let fixed = Stepper::builder(Fixed).with_range(0.0, 10.0).build().unwrap();
    assert!(!fixed.is_limiting());
}
