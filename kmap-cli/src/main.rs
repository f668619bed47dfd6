// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use color_eyre::Result;
use kmap_cli::KmapApp;

fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();
    let app = KmapApp::parse();
    app.exec()
}
