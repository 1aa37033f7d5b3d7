use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = rustls::crypto::ring::default_provider().install_default();
    todo_feed::cli::run().await?;
    Ok(())
}
