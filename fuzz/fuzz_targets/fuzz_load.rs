#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Loading must either succeed or fail with an error, never panic
    if let Ok(experiment) = vesna_cdf::experiment::Experiment::load(Cursor::new(data)) {
        // A loaded document must also survive being written out again
        let _ = experiment.to_xml_string();
        let _ = experiment.recorded_iterations();
    }

    // The codec sees arbitrary node text
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = vesna_cdf::metadata::decode::<vesna_cdf::metadata::ExperimentExtension>(text);
        let _ = vesna_cdf::metadata::human_text(text);
    }
});
