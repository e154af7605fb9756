#![no_main]
use attrtree::encode::{to_json_string, to_text};
use attrtree::{Attr, MapOrder, Normalizer, Options};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(s) {
            let native = Normalizer::default().normalize(&json_value);
            let attrs = [Attr::new("v", native.clone())];
            let _ = to_text(&attrs);
            let _ = to_json_string(&attrs);

            let sorted = Normalizer::new(Options::default().with_map_order(MapOrder::ByKey))
                .normalize(&json_value);
            if let (Some(a), Some(b)) = (native.as_group(), sorted.as_group()) {
                assert_eq!(a.len(), b.len());
            }

            // normalized output is a fixed point
            assert_eq!(Normalizer::default().normalize(&native), native);
        }
    }
});
