#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A temporary workspace with a `raw/` directory of SoWat files.
pub struct TestEnv {
    _tmp: TempDir,
    pub raw: PathBuf,
    pub out: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let raw = tmp.path().join("raw");
        fs::create_dir_all(&raw).expect("create raw dir");
        let out = tmp.path().join("Output");
        Self { _tmp: tmp, raw, out }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sowat-isochores").expect("binary built");
        cmd.env("RUST_LOG", "warn");
        cmd
    }

    pub fn write_raw(&self, identifier: &str, content: &str) -> PathBuf {
        let path = self.raw.join(format!("{identifier}.txt"));
        fs::write(&path, content).expect("write raw file");
        path
    }

    /// Two inclusions of sample BLP1 whose hotter isochore crosses the
    /// spodumene-petalite boundary near 398 °C.
    pub fn write_petalite_sample(&self) {
        self.write_raw("BLP1_A-1", &sowat_file(&linear_isochore(250.0)));
        self.write_raw("BLP1_B-2", &sowat_file(&linear_isochore(300.0)));
    }

    pub fn isochores_csv(&self) -> PathBuf {
        self.out.join("isochores.csv")
    }
}

/// Five points rising 20 bar per °C from `t0` at 0 bar.
pub fn linear_isochore(t0: f64) -> Vec<String> {
    (0..5)
        .map(|i| {
            let t = t0 + 50.0 * i as f64;
            let p = 1000.0 * i as f64;
            format!("  {t:.1}   {p:.1}")
        })
        .collect()
}

pub fn sowat_file<S: AsRef<str>>(body: &[S]) -> String {
    let mut text = String::from(
        "SoWat isochore calculation\n\
         \x20 Temperature of total homogenization Th: 245.3 C\n\
         \x20 Pressure of total homogenization Ph: 35.2 bar\n\
         \x20 Bulk salinity: 4.96 wt% NaCl eq.\n\
         \x20 Bulk density: 0.8712 g/ccm\n\
         \n\
         \x20 Isochore\n\
         \x20 T(C)   P(bar)\n",
    );
    for line in body {
        text.push_str(line.as_ref());
        text.push('\n');
    }
    text.push_str("-----\nend of file\n");
    text
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read output")
}
