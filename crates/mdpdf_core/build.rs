use std::fs;

const CONFIG_PATH: &str = "src/default_config.toml";

/// Keys the bundled config must set, as (section, key).
const REQUIRED: [(&str, &str); 5] = [
    ("page", "margin_mm"),
    ("page", "numbers"),
    ("font", "body_size"),
    ("font", "heading_size"),
    ("font", "system_fonts"),
];

fn main() {
    println!("cargo:rerun-if-changed={CONFIG_PATH}");

    let content = fs::read_to_string(CONFIG_PATH).expect("Failed to read default_config.toml");
    let table = content
        .parse::<toml::Table>()
        .unwrap_or_else(|e| panic!("Invalid default_config.toml: {e}"));

    for (section, key) in REQUIRED {
        let present = table
            .get(section)
            .and_then(|value| value.as_table())
            .is_some_and(|section| section.contains_key(key));
        if !present {
            panic!("default_config.toml is missing {section}.{key}");
        }
    }
}
