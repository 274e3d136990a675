use promptcell_core::kernelspec;

/// Print the fixed kernel-info reply as JSON.
pub async fn run() -> anyhow::Result<()> {
    let info = kernelspec::kernel_info();
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
