//! Build script for dashlink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml at compile time
//! - Generates the `DEVICE_CONFIG` constant from device.toml

use std::collections::BTreeMap;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Integer setting: section, key, inclusive range, default
struct IntField {
    section: &'static str,
    key: &'static str,
    min: i64,
    max: i64,
    default: i64,
}

const fn int(section: &'static str, key: &'static str, min: i64, max: i64, default: i64) -> IntField {
    IntField {
        section,
        key,
        min,
        max,
        default,
    }
}

const INT_FIELDS: &[IntField] = &[
    int("modules", "buttons", 0, 255, 0),
    int("modules", "tm1638", 0, 8, 0),
    int("modules", "seven_segment", 0, 8, 0),
    int("modules", "led_matrix", 0, 8, 0),
    int("modules", "rgb_leds", 0, 128, 0),
    int("modules", "rgb_matrix_pixels", 0, 64, 0),
    int("modules", "encoders", 0, 255, 0),
    int("timing", "read_timeout_ms", 1, 60_000, 200),
    int("timing", "idle_poll_ms", 0, 1_000, 5),
    int("timing", "blink_interval_ms", 1, 10_000, 500),
    int("timing", "debounce_threshold", 1, 1_000, 5),
    int("timing", "cluster_refresh_ms", 0, 60_000, 0),
    int("odometer", "persist_delta", 1, u32::MAX as i64, 10),
];

const BOOL_FIELDS: &[(&str, &str)] = &[
    ("features", "character_lcd"),
    ("features", "graphic_lcd"),
    ("features", "motors"),
];

const KNOWN_SECTIONS: &[&str] = &["identity", "modules", "timing", "odometer", "features"];

const MAX_NAME_LEN: usize = 32;

/// Validated settings ready for code generation
struct Settings {
    name: String,
    unique_id: String,
    version: u8,
    mcu_signature: [u8; 3],
    ints: BTreeMap<String, i64>,
    bools: BTreeMap<String, bool>,
}

fn main() {
    setup_linker();
    let config = load_config();
    let settings = validate_config(&config);
    generate_config(&settings);
}

/// Set up linker search paths and arguments
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x");
    f.write_all(memory_x).expect("write memory.x");

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Avoid duplicates when a .cargo/config.toml already passes these
    let rustflags = env::var("CARGO_ENCODED_RUSTFLAGS").unwrap_or_default();
    for arg in ["--nmagic", "-Tlink.x", "-Tlink-rp.x", "-Tdefmt.x"] {
        if !rustflags.contains(arg) {
            println!("cargo:rustc-link-arg-bins={}", arg);
        }
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse device.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a device.toml configuration file.         ║\n\
            ║  Please create one in the dashlink-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Panic with every collected error in one box
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn lookup<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section).and_then(|s| s.get(key))
}

/// Validate every section and collect the settings
fn validate_config(config: &toml::Value) -> Settings {
    let mut errors = Vec::new();

    if let Some(table) = config.as_table() {
        for section in table.keys() {
            if !KNOWN_SECTIONS.contains(&section.as_str()) {
                errors.push(format!("unknown section [{}]", section));
            }
        }
    }

    let name = validate_string(config, "name", "dashlink", &mut errors);
    if name.is_empty() || name.len() > MAX_NAME_LEN || !name.is_ascii() {
        errors.push(format!(
            "[identity] name must be 1-{} ASCII characters",
            MAX_NAME_LEN
        ));
    }

    let unique_id = validate_string(config, "unique_id", "0000000000000000", &mut errors);
    if !unique_id.is_ascii() {
        errors.push("[identity] unique_id must be ASCII".to_string());
    }

    let version = validate_string(config, "version", "j", &mut errors);
    let version = match version.as_bytes() {
        [b] if b.is_ascii_graphic() => *b,
        _ => {
            errors.push("[identity] version must be one printable character".to_string());
            b'j'
        }
    };

    let mcu_signature = validate_signature(config, &mut errors);

    let mut ints = BTreeMap::new();
    for field in INT_FIELDS {
        let value = match lookup(config, field.section, field.key) {
            None => field.default,
            Some(toml::Value::Integer(v)) => *v,
            Some(_) => {
                errors.push(format!("[{}] {} must be an integer", field.section, field.key));
                continue;
            }
        };
        if value < field.min || value > field.max {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                field.section, field.key, field.min, field.max
            ));
        }
        ints.insert(format!("{}.{}", field.section, field.key), value);
    }

    if let Some(&pixels) = ints.get("modules.rgb_matrix_pixels") {
        if pixels != 0 && pixels != 64 {
            errors.push("[modules] rgb_matrix_pixels must be 0 or 64".to_string());
        }
    }

    let mut bools = BTreeMap::new();
    for &(section, key) in BOOL_FIELDS {
        let value = match lookup(config, section, key) {
            None => false,
            Some(toml::Value::Boolean(b)) => *b,
            Some(_) => {
                errors.push(format!("[{}] {} must be true or false", section, key));
                false
            }
        };
        bools.insert(format!("{}.{}", section, key), value);
    }

    if !errors.is_empty() {
        fail("Invalid device configuration", &errors);
    }

    println!("cargo:warning=device.toml validated successfully");

    Settings {
        name,
        unique_id,
        version,
        mcu_signature,
        ints,
        bools,
    }
}

fn validate_string(config: &toml::Value, key: &str, default: &str, errors: &mut Vec<String>) -> String {
    match lookup(config, "identity", key) {
        None => default.to_string(),
        Some(toml::Value::String(s)) => s.clone(),
        Some(_) => {
            errors.push(format!("[identity] {} must be a string", key));
            default.to_string()
        }
    }
}

fn validate_signature(config: &toml::Value, errors: &mut Vec<String>) -> [u8; 3] {
    const DEFAULT: [u8; 3] = [0x1E, 0x95, 0x0F];
    let Some(value) = lookup(config, "identity", "mcu_signature") else {
        return DEFAULT;
    };
    let bytes: Option<Vec<u8>> = value.as_array().map(|items| {
        items
            .iter()
            .filter_map(|v| v.as_integer())
            .filter_map(|v| u8::try_from(v).ok())
            .collect()
    });
    match bytes {
        Some(b) if b.len() == 3 && value.as_array().map(|a| a.len()) == Some(3) => [b[0], b[1], b[2]],
        _ => {
            errors.push("[identity] mcu_signature must be three bytes".to_string());
            DEFAULT
        }
    }
}

/// Write `device_config.rs` into OUT_DIR
fn generate_config(settings: &Settings) {
    let int = |key: &str| settings.ints.get(key).copied().unwrap_or_default();
    let flag = |key: &str| settings.bools.get(key).copied().unwrap_or_default();
    let [s0, s1, s2] = settings.mcu_signature;

    let code = format!(
        "// Generated by build.rs from device.toml. Do not edit.\n\
        pub const DEVICE_CONFIG: DeviceConfig = DeviceConfig {{\n    \
            identity: Identity {{\n        \
                name: {name:?},\n        \
                unique_id: {unique_id:?},\n        \
                version: {version},\n        \
                mcu_signature: [{s0:#04x}, {s1:#04x}, {s2:#04x}],\n    \
            }},\n    \
            modules: ModuleCounts {{\n        \
                buttons: {buttons},\n        \
                tm1638: {tm1638},\n        \
                seven_segment: {seven_segment},\n        \
                led_matrix: {led_matrix},\n        \
                rgb_leds: {rgb_leds},\n        \
                rgb_matrix_pixels: {rgb_matrix_pixels},\n        \
                encoders: {encoders},\n    \
            }},\n    \
            timing: TimingConfig {{\n        \
                read_timeout_ms: {read_timeout_ms},\n        \
                idle_poll_ms: {idle_poll_ms},\n        \
                blink_interval_ms: {blink_interval_ms},\n        \
                debounce_threshold: {debounce_threshold},\n        \
                cluster_refresh_ms: {cluster_refresh_ms},\n    \
            }},\n    \
            odometer: OdometerConfig {{\n        \
                persist_delta: {persist_delta},\n    \
            }},\n    \
            features: FeatureSet {{\n        \
                led_matrix: false,\n        \
                character_lcd: {character_lcd},\n        \
                graphic_lcd: {graphic_lcd},\n        \
                rgb_matrix: false,\n        \
                motors: {motors},\n    \
            }},\n\
        }};\n",
        name = settings.name,
        unique_id = settings.unique_id,
        version = settings.version,
        buttons = int("modules.buttons"),
        tm1638 = int("modules.tm1638"),
        seven_segment = int("modules.seven_segment"),
        led_matrix = int("modules.led_matrix"),
        rgb_leds = int("modules.rgb_leds"),
        rgb_matrix_pixels = int("modules.rgb_matrix_pixels"),
        encoders = int("modules.encoders"),
        read_timeout_ms = int("timing.read_timeout_ms"),
        idle_poll_ms = int("timing.idle_poll_ms"),
        blink_interval_ms = int("timing.blink_interval_ms"),
        debounce_threshold = int("timing.debounce_threshold"),
        cluster_refresh_ms = int("timing.cluster_refresh_ms"),
        persist_delta = int("odometer.persist_delta"),
        character_lcd = flag("features.character_lcd"),
        graphic_lcd = flag("features.graphic_lcd"),
        motors = flag("features.motors"),
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out_dir.join("device_config.rs"), code).expect("write device_config.rs");
}
