use anyhow::Result;

pub fn handle(url: &str) -> Result<()> {
    tracesmith_export::transmit_from_stdin(url);
    Ok(())
}
