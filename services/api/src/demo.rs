use crate::infra::{InMemoryBusinessDirectory, InMemoryDraftRepository, InMemorySubmissionSink};
use bizreg::directory::{
    export, table, ComplianceFilter, ComplianceStatus, DirectoryService, SortDirection, SortKey,
    TableQuery,
};
use bizreg::error::AppError;
use bizreg::registration::{
    DraftField, FieldValue, NewRequirement, RegistrationError, RegistrationService,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for compliance output (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the registration walkthrough portion of the demo
    #[arg(long)]
    pub(crate) skip_registration: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Compliance filter (all, compliant, pending, noncompliant)
    #[arg(long, default_value = "all")]
    pub(crate) filter: String,
    /// Case-insensitive search across the listing columns
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Sort column (name, owner, municipality, barangay, compliance)
    #[arg(long)]
    pub(crate) sort: Option<String>,
    /// Sort descending instead of ascending
    #[arg(long)]
    pub(crate) desc: bool,
    /// Reference date for compliance (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Output path; prints to stdout when omitted
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

pub(crate) fn run_directory_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        filter,
        search,
        sort,
        desc,
        today,
        out,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let service = DirectoryService::new(Arc::new(InMemoryBusinessDirectory::seeded()));

    let filter = ComplianceFilter::parse(&filter);
    let rows = service.list_filtered(filter, today)?;
    let query = TableQuery {
        search,
        sort_key: sort.as_deref().and_then(SortKey::parse),
        sort_direction: if desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
        page: None,
        page_size: None,
    }
    .without_pagination();
    let page = table::apply(rows, &query);

    let bytes = export::to_csv(&page.rows)?;
    match out {
        Some(path) => {
            std::fs::write(&path, &bytes)?;
            println!(
                "Exported {} {} businesses to {}",
                page.total_rows,
                filter.label(),
                path.display()
            );
        }
        None => print!("{}", String::from_utf8_lossy(&bytes)),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        skip_registration,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Business permit portal demo (evaluated {today})");

    if !skip_registration {
        run_registration_walkthrough()?;
    }

    run_directory_overview(today)?;
    Ok(())
}

fn run_registration_walkthrough() -> Result<(), AppError> {
    let sink = Arc::new(InMemorySubmissionSink::default());
    let service = RegistrationService::new(Arc::new(InMemoryDraftRepository::default()), sink.clone());

    println!("\nRegistration wizard");
    let view = service.start()?;
    let draft_id = view.draft_id.clone();
    println!("Opened {draft_id}");
    print_steps(&view.steps);

    let text_writes = [
        (DraftField::FirstName, "Juan"),
        (DraftField::LastName, "Dela Cruz"),
        (DraftField::Email, "juan@email.com"),
        (DraftField::BirthDate, "1985-04-12"),
    ];
    for (field, value) in text_writes {
        service.update_field(&draft_id, field, FieldValue::Text(value.to_string()))?;
    }
    let view = service.advance(&draft_id)?;
    println!("\nAfter Taxpayer Info");
    print_steps(&view.steps);

    service.update_field(
        &draft_id,
        DraftField::BusinessName,
        FieldValue::Text("Leganes General Store".to_string()),
    )?;
    service.update_field(
        &draft_id,
        DraftField::RegistrationNumber,
        FieldValue::Text("REG-2024-0001".to_string()),
    )?;
    service.advance(&draft_id)?;

    let view = service.add_requirement(
        &draft_id,
        NewRequirement {
            kind: "DTI".to_string(),
            description: "DTI certificate of registration".to_string(),
            file_name: "dti-certificate.pdf".to_string(),
        },
    )?;
    println!(
        "\nRequirements on file: {} ({} uploaded)",
        view.draft.requirements.len(),
        view.draft.uploaded_requirements()
    );

    service.advance(&draft_id)?;

    // First submit attempt: terms not accepted yet, so validation reports it.
    match service.submit(&draft_id) {
        Err(RegistrationError::Validation(violations)) => {
            println!("\nSubmission blocked:");
            for violation in &violations {
                println!("- {violation}");
            }
        }
        Ok(_) => println!("\nSubmission unexpectedly accepted"),
        Err(other) => return Err(other.into()),
    }

    service.update_field(&draft_id, DraftField::AgreedToTerms, FieldValue::Flag(true))?;
    let receipt = service.submit(&draft_id)?;
    println!(
        "\nSubmitted {} ({}), {} requirement(s) uploaded",
        receipt.draft_id, receipt.status, receipt.requirements_uploaded
    );
    println!("Applications handed to the backend: {}", sink.applications().len());

    Ok(())
}

fn run_directory_overview(today: NaiveDate) -> Result<(), AppError> {
    let service = DirectoryService::new(Arc::new(InMemoryBusinessDirectory::seeded()));

    let stats = service.stats(today)?;
    println!("\nDirectory overview");
    println!(
        "- {} businesses across {} municipalit{}",
        stats.total,
        stats.municipalities,
        if stats.municipalities == 1 { "y" } else { "ies" }
    );
    for status in ComplianceStatus::ordered() {
        let count = service
            .list_filtered(ComplianceFilter::parse(status.label()), today)?
            .len();
        println!("- {}: {}", status.label(), count);
    }

    let markers = service.markers(ComplianceFilter::All, today)?;
    println!("\nMap markers");
    for marker in &markers {
        println!(
            "- {} [{}] at ({:.4}, {:.4}) - {}",
            marker.business_name,
            marker.compliance.label(),
            marker.position.lat,
            marker.position.lng,
            marker.address
        );
    }

    Ok(())
}

fn print_steps(steps: &[bizreg::registration::StepView]) {
    for step in steps {
        println!(
            "  {}. {} [{}]",
            step.step_number,
            step.label,
            step.status.label()
        );
    }
}
