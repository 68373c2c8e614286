use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=proto/auth.proto");
    tonic_build::configure()
        .out_dir("src/generated")
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/auth.proto"], &["proto"])?;
    Ok(())
}
