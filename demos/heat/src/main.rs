use heat::d1::{HeatConfig, HeatEquation};
use plot_util::{save_history, ProfilePlot};

fn main() -> anyhow::Result<()> {
    let heat = HeatEquation::new(HeatConfig::default());
    let n = heat.steps();

    let heat = heat.solve_with(|step| {
        if step % 100 == 0 || step + 1 == n {
            eprint!("\r {} / {}", step + 1, n);
        }
    });
    eprintln!();

    std::fs::create_dir_all("out")?;

    save_history("out/history.png", heat.history())?;
    heat.show(&mut ProfilePlot::new("out/heat.png"))?;

    Ok(())
}
