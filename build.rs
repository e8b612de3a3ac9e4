use std::env;
use std::fs;
use std::path::Path;

// Variables que lee ScannerConfig::from_env() con option_env!
const SCANNER_KEYS: &[&str] = &[
    "QR_SCANNER_ROOT",
    "QR_SCANNER_DEBUG",
    "QR_SCANNER_FACING_MODE",
    "QR_SCANNER_FACING_MODE_REQUIRED",
];

fn main() {
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                // Ignorar comentarios y líneas vacías
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    if !SCANNER_KEYS.contains(&key) {
                        println!("cargo:warning=.env: variable desconocida {}, ignorada", key);
                        continue;
                    }

                    // Solo configurar si no está ya definida
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    }

    for key in SCANNER_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
}
