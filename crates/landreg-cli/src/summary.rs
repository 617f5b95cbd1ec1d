use console::Style;
use landreg_core::coreg::CoregistrationReport;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    best: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            best: Style::new().green(),
        }
    }
}

pub fn print_registration_summary(report: &CoregistrationReport, top: usize) {
    let s = Styles::new();
    let best = report.best_score();
    let (res_x, res_y) = report.shifted_image.resolution();

    println!();
    println!("  {}", s.title.apply_to("Co-registration"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(15)));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Candidates"),
        s.value.apply_to(report.candidates.len())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Samples"),
        s.value.apply_to(report.sample_count)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Best shift"),
        s.best.apply_to(format!(
            "{} map units ({:+} px, {:+} px)",
            report.best_shift,
            report.best_shift.dx / res_x,
            report.best_shift.dy / res_y
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Best MI"),
        s.value.apply_to(format!("{:.6}", best.mutual_information))
    );
    println!();

    println!("  {:>5}  {:>10}  {:>10}  {:>10}", "Rank", "dx", "dy", "MI");
    println!("  {}", "-".repeat(42));
    for (rank, score) in report.ranked().iter().take(top).enumerate() {
        let line = format!(
            "{:>5}  {:>10.3}  {:>10.3}  {:>10.6}",
            rank + 1,
            score.dx,
            score.dy,
            score.mutual_information
        );
        if score.shift() == report.best_shift {
            println!("  {}", s.best.apply_to(line));
        } else {
            println!("  {}", line);
        }
    }
    println!();
}
