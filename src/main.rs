use anyhow::Result;
use styletl::StyloETL;

const DATA_ROOT: &str = "./data";
const OUT_ROOT: &str = "./out";

fn main() -> Result<()> {
    let hw = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(8);

    let summary = StyloETL::new()
        .data_dir(DATA_ROOT)
        .out_dir(OUT_ROOT)
        .parallelism(hw)
        .progress(true)
        .run()?;

    println!(
        "Processed {} dumps: {} users kept, {} dataset rows",
        summary.dumps, summary.users, summary.rows
    );
    Ok(())
}
