use crate::core::{FormState, FsrInput, IfrInput, IndicatorInput, IsrInput};
use crate::error::{RankError, RankResult};
use crate::excel::{record_to_csv, SheetExporter};
use crate::import::ImportService;
use crate::records::{load_named_record, submit_record};
use crate::schema::Indicator;
use crate::store::JsonFileStore;
use crate::types::{UniversityRecord, UserId};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Format a number for display, removing unnecessary decimal places
fn format_number(n: f64) -> String {
    format!("{:.3}", n)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".dimmed().to_string(), |v| v.to_string())
}

fn calculate<I: IndicatorInput>(input: I, json: bool) -> RankResult<()> {
    let state = FormState::evaluate(&input);

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        let family = I::FAMILY;
        println!(
            "{}",
            format!("📐 {} ({})", family.title(), family.code()).bold().green()
        );

        match &state.result {
            Some(result) => {
                println!("   Ratio:      {}", format_number(result.ratio).bold());
                println!("   Percentage: {}%", format_number(result.percentage).bold());
                println!(
                    "   Score:      {}/100",
                    format_number(result.score).bright_blue().bold()
                );
            }
            None => println!("   {}", "No result for these inputs".yellow()),
        }

        for error in &state.errors {
            println!("   {} {}: {}", "⚠️".yellow(), error.field.cyan(), error.message);
        }
        println!();
    }

    if state.result.is_none() && !state.errors.is_empty() {
        return Err(RankError::Validation(state.errors));
    }
    Ok(())
}

/// Execute the fsr command
pub fn fsr(staff: Option<f64>, students: Option<f64>, json: bool) -> RankResult<()> {
    calculate(
        FsrInput {
            total_academic_staff: staff,
            total_students: students,
        },
        json,
    )
}

/// Execute the ifr command
pub fn ifr(international_staff: Option<f64>, total_staff: Option<f64>, json: bool) -> RankResult<()> {
    calculate(
        IfrInput {
            international_staff,
            total_academic_staff: total_staff,
        },
        json,
    )
}

/// Execute the isr command
pub fn isr(
    international_students: Option<f64>,
    total_students: Option<f64>,
    json: bool,
) -> RankResult<()> {
    calculate(
        IsrInput {
            international_students,
            total_students,
        },
        json,
    )
}

/// Execute the import command
pub async fn import(input: PathBuf, user: UserId, store: PathBuf, verbose: bool) -> RankResult<()> {
    println!("{}", "🎓 UniRank - Excel Import".bold().green());
    println!("   Input: {}", input.display());
    println!("   Store: {}\n", store.display());

    if verbose {
        println!("{}", "📖 Reading Excel file (headers on row 4)...".cyan());
    }

    let service = ImportService::new(Arc::new(JsonFileStore::new(&store)));
    let outcome = service.import_file(&user, &input).await?;

    if verbose {
        println!("   Parsed {} data rows\n", outcome.parsed);
    }

    println!("{}", "✅ Import Successful!".bold().green());
    println!(
        "   Successfully imported {} records to the database.\n",
        outcome.inserted.to_string().bold()
    );
    Ok(())
}

/// Execute the sample command
pub fn sample(output: PathBuf) -> RankResult<()> {
    println!("{}", "🎓 UniRank - Sample Workbook".bold().green());

    SheetExporter::sample().export(&output)?;

    println!("{}", "✅ Sample written!".bold().green());
    println!("   Excel file: {}", output.display());
    println!("   Headers on row 4, data from row 5 (10 universities)\n");
    Ok(())
}

fn print_record(record: &UniversityRecord) {
    println!("{}", record.name.bright_blue().bold());
    println!(
        "   Rank: {}   Overall score: {}",
        optional(record.rank).bold(),
        optional(record.overall_score.map(format_number)).bold()
    );
    println!(
        "   Country: {}   Region: {}",
        optional(record.country.as_deref()),
        optional(record.region.as_deref())
    );

    let c = &record.classification;
    println!(
        "   Size: {}  Focus: {}  Research: {}  Status: {}",
        optional(c.size.map(|s| s.code())),
        optional(c.focus.map(|f| f.code())),
        optional(c.research.map(|r| r.code())),
        optional(c.status.map(|s| s.code()))
    );

    println!("\n   📊 Indicators:");
    for indicator in Indicator::ALL {
        let entry = record.indicators.get(&indicator).copied().unwrap_or_default();
        println!(
            "      {:<34} {:>8}  rank {}",
            indicator.label().cyan(),
            optional(entry.score.map(format_number)),
            optional(entry.rank)
        );
    }
    println!();
}

/// Execute the load command
pub async fn load(name: String, user: UserId, store: PathBuf, json: bool) -> RankResult<()> {
    let store = JsonFileStore::new(&store);
    let record = load_named_record(&store, &user, &name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record);
    }
    Ok(())
}

/// Execute the export command
pub async fn export(name: String, output: PathBuf, user: UserId, store: PathBuf) -> RankResult<()> {
    println!("{}", "🎓 UniRank - Excel Export".bold().green());

    let store = JsonFileStore::new(&store);
    let record = load_named_record(&store, &user, &name).await?;
    SheetExporter::from_records(std::slice::from_ref(&record)).export(&output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}\n", output.display());
    Ok(())
}

/// Execute the csv command
pub async fn csv(name: String, output: PathBuf, user: UserId, store: PathBuf) -> RankResult<()> {
    let store = JsonFileStore::new(&store);
    let record = load_named_record(&store, &user, &name).await?;
    fs::write(&output, record_to_csv(&record)?)?;

    println!("{}", "✅ CSV written!".bold().green());
    println!("   File: {}\n", output.display());
    Ok(())
}

/// Execute the save command
pub async fn save(file: PathBuf, user: UserId, store: PathBuf) -> RankResult<()> {
    let content = fs::read_to_string(&file)?;
    let record: UniversityRecord = serde_yaml::from_str(&content)?;

    let store = JsonFileStore::new(&store);
    match submit_record(&store, &user, &record).await {
        Ok(stored) => {
            println!("{}", "✅ Record saved!".bold().green());
            println!("   {} ({})\n", record.name.bright_blue(), stored.id);
            Ok(())
        }
        Err(RankError::Validation(errors)) => {
            println!("{}", "❌ Record has invalid fields:".bold().red());
            for error in &errors {
                println!("   {}: {}", error.field.cyan(), error.message);
            }
            println!();
            Err(RankError::Validation(errors))
        }
        Err(e) => Err(e),
    }
}
