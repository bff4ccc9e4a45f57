#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = bonafide_rust::run().await {
        eprintln!("bonafide-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
