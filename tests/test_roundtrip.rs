//! Property tests: rendered configurations load back unchanged.

use proptest::prelude::*;

use sexcfg::config::{ConfigLoader, RenderOptions, render};

/// One `KEY value` line with a value valid for the built-in registry.
fn entry() -> impl Strategy<Value = (&'static str, String)> {
    prop_oneof![
        (0.0f64..1e6).prop_map(|v| ("GAIN", format!("{v}"))),
        (-100.0f64..100.0).prop_map(|v| ("MAG_ZEROPOINT", format!("{v:e}"))),
        (1i64..=64).prop_map(|v| ("DEBLEND_NTHRESH", v.to_string())),
        (1000i64..=2_147_483_647).prop_map(|v| ("MEMORY_PIXSTACK", v.to_string())),
        prop::collection::vec(0.0f64..500.0, 1..12).prop_map(|v| {
            let joined: Vec<String> = v.iter().map(ToString::to_string).collect();
            ("PHOT_APERTURES", joined.join(", "))
        }),
        prop::collection::vec(1i64..=7, 1..=2).prop_map(|v| {
            let joined: Vec<String> = v.iter().map(ToString::to_string).collect();
            ("BACK_FILTERSIZE", joined.join(","))
        }),
        prop::sample::select(vec!["NONE", "ASCII", "ASCII_HEAD", "FITS_1.0", "FITS_LDAC"])
            .prop_map(|t| ("CATALOG_TYPE", t.to_string())),
        prop::sample::select(vec!["QUIET", "NORMAL", "FULL"])
            .prop_map(|t| ("VERBOSE_TYPE", t.to_string())),
        any::<bool>().prop_map(|b| ("FILTER", if b { "Y" } else { "N" }.to_string())),
        "[A-Za-z0-9_./-]{1,24}".prop_map(|s| ("CATALOG_NAME", s)),
        "[A-Za-z0-9_. #$-]{0,24}".prop_map(|s| ("XML_NAME", quote(&s))),
        prop::collection::vec("[A-Za-z0-9_. $-]{0,16}", 1..=4)
            .prop_map(|v| ("FLAG_IMAGE", quote_list(&v))),
        ("[A-Za-z0-9_. #$-]{0,16}", prop::option::of("[A-Za-z0-9_.$-]{1,16}")).prop_map(
            |(first, second)| {
                let mut names = vec![first];
                names.extend(second);
                ("WEIGHT_IMAGE", quote_list(&names))
            }
        ),
        prop::collection::vec(prop::sample::select(vec!["RELATIVE", "ABSOLUTE"]), 1..=2)
            .prop_map(|v| ("THRESH_TYPE", v.join(", "))),
        prop::collection::vec(prop::sample::select(vec!["AUTO", "MANUAL"]), 1..=2)
            .prop_map(|v| ("BACK_TYPE", v.join(","))),
    ]
}

/// Quotes every element; only the first may hold `#`.
fn quote_list(elements: &[String]) -> String {
    let quoted: Vec<String> = elements.iter().map(|e| quote(e)).collect();
    quoted.join(", ")
}

/// Writes a string value the way a user would: quoted, with `$` doubled.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('$', "$$"))
}

/// A file text with at most one line per key.
fn config_text() -> impl Strategy<Value = String> {
    prop::collection::vec(entry(), 0..16).prop_map(|entries| {
        let mut seen = std::collections::HashSet::new();
        entries
            .into_iter()
            .filter(|(key, _)| seen.insert(*key))
            .map(|(key, value)| format!("{key:<17}{value}  # set by test\n"))
            .collect()
    })
}

proptest! {
    #[test]
    fn rendered_config_reloads_equal(text in config_text()) {
        let loader = ConfigLoader::with_defaults();
        let original = loader.load_from_str(&text).unwrap();

        let rendered = render(&original.config, loader.registry(), RenderOptions::default())
            .to_string();
        let reloaded = loader.load_from_str(&rendered).unwrap();

        prop_assert_eq!(&*reloaded.config, &*original.config);
    }

    #[test]
    fn rendering_is_stable(text in config_text()) {
        let loader = ConfigLoader::with_defaults();
        let once = loader.load_from_str(&text).unwrap();
        let first = render(&once.config, loader.registry(), RenderOptions::default()).to_string();
        let twice = loader.load_from_str(&first).unwrap();
        let second = render(&twice.config, loader.registry(), RenderOptions::default()).to_string();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn parsing_never_panics(text in "\\PC*") {
        let loader = ConfigLoader::with_defaults();
        let _ = loader.load_from_str(&text);
        let _ = loader.check_str(&text);
    }
}
