mod app;
mod bank;
mod config;
mod engine;
mod session;
mod store;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use app::App;
use bank::question::AnswerChoice;

#[derive(Parser)]
#[command(
    name = "permitdrill",
    version,
    about = "Adaptive practice for the California DMV permit test"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Take an adaptive practice quiz
    Quiz {
        /// Limit questions to one category
        #[arg(short, long)]
        category: Option<String>,
        /// Number of questions to draw
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Show the readiness report
    Readiness,
    /// Show profile and per-category statistics
    Stats,
    /// List question categories
    Categories,
    /// Delete all recorded attempts and reset progress
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Export profile and attempt history to a JSON file
    Export { path: PathBuf },
    /// Import a previously exported JSON file
    Import { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut app = App::new()?;

    match cli.command.unwrap_or(Command::Quiz {
        category: None,
        count: None,
    }) {
        Command::Quiz { category, count } => run_quiz(&mut app, category, count)?,
        Command::Readiness => print_readiness(&app),
        Command::Stats => print_stats(&app),
        Command::Categories => {
            for category in app.bank.categories() {
                println!("{category}");
            }
        }
        Command::Reset { yes } => run_reset(&mut app, yes)?,
        Command::Export { path } => {
            app.export(&path)?;
            println!("Exported to {}", path.display());
        }
        Command::Import { path } => {
            app.import(&path)?;
            println!(
                "Imported {} attempts from {}",
                app.history.len(),
                path.display()
            );
        }
    }

    Ok(())
}

fn run_quiz(app: &mut App, category: Option<String>, count: Option<usize>) -> Result<()> {
    let drawn = app.start_quiz(category.as_deref(), count);
    if drawn == 0 {
        println!("No questions available for that selection.");
        if category.is_some() {
            println!("Known categories: {}", app.bank.categories().join(", "));
        }
        return Ok(());
    }

    println!("Starting a {drawn}-question quiz. Answer with a-d, or q to stop early.\n");

    let stdin = io::stdin();
    let mut number = 1usize;
    while let Some(question) = app.current_question().cloned() {
        println!("{number}. [{}] {}", question.category, question.text);
        for choice in AnswerChoice::ALL {
            println!("   {}) {}", choice.as_str(), question.choice_text(choice));
        }

        let choice = loop {
            print!("> ");
            io::stdout().flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                // stdin closed mid-quiz; keep what was answered
                app.abandon_quiz();
                print_quiz_summary(app);
                return Ok(());
            }
            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("q") {
                app.abandon_quiz();
                print_quiz_summary(app);
                return Ok(());
            }
            match AnswerChoice::from_input(trimmed) {
                Some(choice) => break choice,
                None => println!("Please answer a, b, c, d, or q to stop."),
            }
        };

        let correct = app.submit_answer(choice).unwrap_or(false);
        if correct {
            println!("Correct!\n");
        } else {
            println!(
                "Wrong. The answer is {}) {}.",
                question.answer.as_str(),
                question.choice_text(question.answer)
            );
            if app.config.show_explanations
                && let Some(ref explanation) = question.explanation
            {
                println!("{explanation}");
            }
            println!();
        }
        number += 1;
    }

    print_quiz_summary(app);
    Ok(())
}

fn print_quiz_summary(app: &App) {
    if let Some(ref result) = app.last_result {
        println!(
            "Score: {}/{} ({:.0}%) in {:.0}s",
            result.correct, result.total, result.accuracy, result.elapsed_secs
        );
        let score = app.readiness();
        println!(
            "Readiness: {}% ({}). Run `permitdrill readiness` for details.",
            score.percentage,
            score.status.as_str()
        );
    }
}

fn print_readiness(app: &App) {
    let score = app.readiness();
    println!("Readiness: {}% ({})", score.percentage, score.status.as_str());
    println!("Accuracy:  {:.0}%", score.overall_accuracy * 100.0);
    println!(
        "Coverage:  {} of {} questions seen",
        score.questions_seen, score.total_questions
    );
    if let Some(ref category) = score.weakest_category {
        println!(
            "Weakest:   {category} ({:.0}%)",
            score.weakest_accuracy * 100.0
        );
    }
    println!();
    for recommendation in &score.recommendations {
        println!("- {recommendation}");
    }
}

fn print_stats(app: &App) {
    let profile = &app.profile;
    println!(
        "Answered {} questions, {} correct, over {} quizzes",
        profile.total_answered, profile.total_correct, profile.quizzes_taken
    );
    if profile.streak_days > 0 {
        println!(
            "Practice streak: {} day(s), best {}",
            profile.streak_days, profile.best_streak
        );
    }

    let overview = app.category_overview();
    if overview.is_empty() {
        println!("\nNo attempts recorded yet.");
        return;
    }

    println!();
    for category in overview {
        let marker = if category.is_weak { "  (weak)" } else { "" };
        println!(
            "{:<20} {:>3} seen  {:>4}/{:<4} correct  {:>3.0}%{}",
            category.category,
            category.questions_answered,
            category.correct_attempts,
            category.total_attempts,
            category.accuracy * 100.0,
            marker
        );
    }

    let missed = app.most_missed(5);
    if !missed.is_empty() {
        println!("\nMost missed:");
        for perf in missed {
            println!(
                "  {:<12} {}/{} correct, avg {:.0}s  [{}]",
                perf.question_id,
                perf.times_correct,
                perf.times_seen,
                perf.average_time_secs,
                perf.category
            );
        }
    }
}

fn run_reset(app: &mut App, yes: bool) -> Result<()> {
    if !yes {
        print!("This deletes all recorded attempts and progress. Type 'yes' to confirm: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        if line.trim() != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }
    app.reset_progress()?;
    println!("Progress reset.");
    Ok(())
}
