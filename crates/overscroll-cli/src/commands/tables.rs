use anyhow::Result;

use overscroll_core::scroller::spline::{self, NB_SAMPLES};

pub fn run(json: bool) -> Result<()> {
    let tables = spline::tables();

    if json {
        let value = serde_json::json!({
            "position": tables.position.to_vec(),
            "time": tables.time.to_vec(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{:>5}  {:>10}  {:>10}", "i", "position", "time");
    for i in 0..=NB_SAMPLES {
        println!(
            "{:>5}  {:>10.6}  {:>10.6}",
            i, tables.position[i], tables.time[i]
        );
    }

    Ok(())
}
