use crate::infra::{in_memory_service, seed_demo_student};
use clap::Args;
use leaps::error::AppError;
use leaps::records::{Achievement, AttainmentReport, LeadershipPosition, ServiceEvent, UserId};
use leaps::rules::{compute_attainment, level_guide, DomainLevels, Level, LevelDistribution};
use serde::Serialize;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Leadership domain level (0-5)
    #[arg(long, default_value_t = 0)]
    pub(crate) leadership: u8,
    /// Achievement domain level (0-5)
    #[arg(long, default_value_t = 0)]
    pub(crate) achievement: u8,
    /// Participation domain level (0-5)
    #[arg(long, default_value_t = 0)]
    pub(crate) participation: u8,
    /// Service domain level (0-4)
    #[arg(long, default_value_t = 0)]
    pub(crate) service: u8,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Student id used for the seeded records
    #[arg(long, default_value = "demo-student")]
    pub(crate) user: String,
    /// Print the full report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Append the level guide to the text output
    #[arg(long)]
    pub(crate) guide: bool,
}

#[derive(Debug, Serialize)]
struct EvaluationOutput {
    levels: DomainLevels,
    summary: String,
    distribution: LevelDistribution,
}

pub(crate) fn run_evaluation(args: EvaluateArgs) -> Result<(), AppError> {
    let levels = DomainLevels {
        leadership: Level::new(args.leadership)?,
        achievement: Level::new(args.achievement)?,
        participation: Level::new(args.participation)?,
        service: Level::new(args.service)?,
    };
    let rating = compute_attainment(&levels);

    if args.json {
        let output = EvaluationOutput {
            levels,
            summary: rating.summary(),
            distribution: levels.distribution(),
        };
        print_json(&output);
        return Ok(());
    }

    println!("Attainment evaluation");
    print_levels(&levels);
    println!("  Rating: {}", rating.summary());
    print_distribution(&levels.distribution());
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let (service, publisher) = in_memory_service();
    let user = UserId(args.user);
    seed_demo_student(&service, &user)?;
    let report = service.report(&user)?;

    if args.json {
        print_json(&report);
        return Ok(());
    }

    println!("LEAPS attainment demo");
    render_report(&report);

    println!("\nLeadership positions");
    for position in service.records::<LeadershipPosition>(&user)? {
        println!("  - {} ({}): level {}", position.name, position.year, position.level);
    }

    println!("\nAchievements (highest first)");
    for achievement in service.records::<Achievement>(&user)? {
        println!(
            "  - {} [{}], {}: level {}",
            achievement.name,
            achievement.representation.label(),
            achievement.year,
            achievement.level
        );
    }

    println!("\nService events");
    for event in service.records::<ServiceEvent>(&user)? {
        println!("  - {}: {} h, {}", event.name, event.hours, event.kind.label());
    }

    println!("\n{} attainment updates published", publisher.events().len());

    if args.guide {
        println!("\nLevel guide");
        for guide in level_guide() {
            println!("  {}: {}", guide.domain.label(), guide.summary);
            for entry in &guide.levels {
                println!("    {} - {}", entry.level, entry.description);
            }
        }
    }

    Ok(())
}

fn render_report(report: &AttainmentReport) {
    let profile = &report.profile;
    println!(
        "  Student: {} ({}), {} house, {}",
        profile.name, profile.year, profile.house, profile.cca
    );
    print_levels(&report.levels);
    println!(
        "  Current leadership: {} (level {})",
        report.leadership.position, report.leadership.level
    );
    println!(
        "  Service: {} h across {} VIA and {} SIP projects",
        report.service.total_hours, report.service.via_count, report.service.sip_count
    );
    println!(
        "  Participation: {}% attendance over {} years",
        report.participation.attendance_percent, report.participation.years_in_cca
    );
    println!("  Enrichment events: {}", report.enrichment_count);
    println!("  Rating: {}", report.rating.summary());
    print_distribution(&report.distribution);
}

fn print_levels(levels: &DomainLevels) {
    println!(
        "  Levels: leadership {}, achievement {}, participation {}, service {}",
        levels.leadership, levels.achievement, levels.participation, levels.service
    );
}

fn print_distribution(distribution: &LevelDistribution) {
    println!(
        "  Distribution: L1 x{}, L2 x{}, L3 x{}, L4 x{}, L5 x{}",
        distribution.level_one,
        distribution.level_two,
        distribution.level_three,
        distribution.level_four,
        distribution.level_five
    );
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("failed to render json: {err}"),
    }
}
