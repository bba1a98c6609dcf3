#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    let Ok(cfg) = toml::from_str::<stride_config::Config>(data) else {
        return;
    };
    let valid = cfg.validate().is_ok();
    // Anything validate() accepts must build, unless it points at a CSV file.
    let reads_csv = matches!(
        &cfg.strategy,
        stride_config::StrategyCfg::Checkpoint(c) if c.stops_csv.is_some()
    ) || matches!(
        &cfg.strategy,
        stride_config::StrategyCfg::Sequence(c) if c.sizes_csv.is_some()
    );
    let built = stride_core::build_stepper(&cfg);
    if valid && !reads_csv {
        assert!(built.is_ok(), "validated config failed to build: {data}");
    }
});
