// main.rs
//
// Generate the default mana item into the 'out' folder: binary STLs at two
// resolutions plus the JSON project document.

use manamesh::pipeline::{self, OrnamentParams};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let params = OrnamentParams::default();
    match pipeline::export(&params, Path::new("out")) {
        Ok(doc) => {
            for output in &doc.outputs {
                println!("wrote {output}");
            }
            println!("done.");
            ExitCode::SUCCESS
        },
        Err(err) => {
            tracing::error!(error = %err, "generation failed");
            ExitCode::FAILURE
        },
    }
}
