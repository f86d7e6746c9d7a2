#![no_main]

use libfuzzer_sys::fuzz_target;
use sexcfg::config::loader::ConfigLoader;
use sexcfg::config::render::{RenderOptions, render};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let loader = ConfigLoader::with_defaults();
    let _ = loader.check_str(text);

    // Whatever loads must render to text that loads back equal
    if let Ok(result) = loader.load_from_str(text) {
        let rendered =
            render(&result.config, loader.registry(), RenderOptions::default()).to_string();
        let reloaded = loader
            .load_from_str(&rendered)
            .expect("rendered config must reload");
        assert_eq!(reloaded.config, result.config);
    }
});
