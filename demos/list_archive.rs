/*
MIT License

Copyright (c) 2021 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/
use std::fs::File;
use tar_walker::{IoSource, TarArchive};

/// This example needs the `std` feature.
///
/// Usage: `cargo run --example list_archive --features std -- [archive.tar]`
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // log: not mandatory
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/gnu_tar_ustar.tar".to_string());
    let mut archive = TarArchive::new(IoSource::new(File::open(&path)?)?);

    if !archive.validate() {
        println!("{path} is not a ustar archive");
        return Ok(());
    }

    println!("{:#?}", archive.list_entries());
    // raw names also work for entries whose name isn't UTF-8
    for name in archive.list_entry_names() {
        let preview = archive.extract_entry_bytes(&name, 32)?;
        println!(
            "{}: {:?}",
            String::from_utf8_lossy(&name),
            String::from_utf8_lossy(&preview)
        );
    }
    Ok(())
}
