// build.rs

use std::env;

fn main() -> anyhow::Result<()> {
    let api_port = env::var("API_PORT").unwrap_or_else(|_| "8080".into());
    let install_path = env::var("INSTALL_PATH").unwrap_or_else(|_| "/var/www/mycodo".into());

    println!("cargo:rustc-env=API_PORT={api_port}");
    println!("cargo:rustc-env=INSTALL_PATH={install_path}");
    println!("cargo:rerun-if-env-changed=API_PORT");
    println!("cargo:rerun-if-env-changed=INSTALL_PATH");

    Ok(())
}

// EOF
