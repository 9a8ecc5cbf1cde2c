use clientele_core::{CreateCustomerRequest, CustomerErrorKind, CustomerGateway, CustomerService};
use clientele_db::SqlCustomerRepository;

use crate::commands::{open_migrated_pool, prepare, CommandResult, StepError};

pub const DEMO_CUSTOMERS: [(&str, &str, &str); 3] = [
    ("Swamynathan", "swamynathan@gmail.com", "US"),
    ("Yogi", "yogi@gmail.com", "Chennai"),
    ("Sam", "sam@gmail.com", "Dubai"),
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: usize,
    pub skipped: usize,
}

impl SeedSummary {
    pub fn message(&self) -> String {
        format!(
            "demo customers seeded: {} created, {} already present",
            self.created, self.skipped
        )
    }
}

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_migrated_pool(&config).await?;
        let service = CustomerService::new(SqlCustomerRepository::new(pool.clone()));
        let summary = seed_demo_customers(&service).await;
        pool.close().await;
        summary
    });

    match result {
        Ok(summary) => CommandResult::success("seed", summary.message()),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

/// Goes through the service so the email uniqueness rule decides what gets skipped.
pub async fn seed_demo_customers<G: CustomerGateway>(
    service: &CustomerService<G>,
) -> Result<SeedSummary, StepError> {
    let mut summary = SeedSummary::default();

    for (name, email, address) in DEMO_CUSTOMERS {
        match service.create_customer(CreateCustomerRequest::new(name, email, address)).await {
            Ok(_) => summary.created += 1,
            Err(error) if error.customer_kind() == Some(CustomerErrorKind::EmailUnavailable) => {
                tracing::debug!(
                    event_name = "cli.seed.skipped",
                    correlation_id = "cli",
                    email,
                    "demo customer already present"
                );
                summary.skipped += 1;
            }
            Err(error) => return Err(("seed_execution", error.to_string(), 6u8)),
        }
    }

    Ok(summary)
}
