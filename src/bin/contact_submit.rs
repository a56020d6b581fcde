use clap::Parser;
use contact_form::client::{BannerClass, FormController, HttpSubmitter, SubmitOutcome};
use contact_form::utils::logger;
use contact_form::{ContactFields, Locale, SubmitArgs};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = SubmitArgs::parse();
    logger::init_cli_logger(args.verbose);

    let locale = match args.locale.as_str() {
        "bg" => Locale::Bg,
        _ => Locale::En,
    };
    let timeout = (args.timeout > 0).then(|| Duration::from_secs(args.timeout));

    let submitter = HttpSubmitter::new(args.endpoint.clone(), timeout)?;
    let controller = FormController::new(submitter, locale);
    controller.fill(ContactFields::new(
        args.name,
        args.email,
        args.phone,
        args.message,
    ));

    let outcome = controller.submit().await;
    let banner = controller.banner().snapshot();
    tracing::debug!("Submit outcome: {:?}", outcome);

    match banner.class {
        Some(BannerClass::Success) => {
            println!("✅ {}", banner.text);
            Ok(())
        }
        _ => {
            eprintln!("❌ {}", banner.text);
            let code = match outcome {
                SubmitOutcome::Rejected(_) => 2,
                SubmitOutcome::NetworkFailed => 3,
                _ => 1,
            };
            std::process::exit(code);
        }
    }
}
