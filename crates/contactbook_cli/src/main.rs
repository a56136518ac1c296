//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `contactbook_core` linkage, configuration and database bootstrap.
//! - Print deterministic `key=value` lines for quick local checks.

use contactbook_core::db::open_db;
use contactbook_core::{
    init_logging, ContactService, CoreConfig, GroupService, SqliteContactRepository,
    SqliteGroupRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("contactbook error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("contactbook_core ping={}", contactbook_core::ping());
    println!("contactbook_core version={}", contactbook_core::core_version());

    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path)?;
    let groups = GroupService::with_delete_policy(
        SqliteGroupRepository::try_new(&conn)?,
        config.group_delete_policy,
    );
    let contacts = ContactService::new(SqliteContactRepository::try_new(&conn)?);

    let group_count = groups.list_groups()?.len();
    let contact_count = contacts.list_contacts()?.len();
    info!(
        "event=cli_status module=cli status=ok groups={group_count} contacts={contact_count}"
    );

    println!("contactbook db_path={}", config.db_path.display());
    println!(
        "contactbook group_delete_policy={}",
        groups.delete_policy().as_str()
    );
    println!("contactbook groups={group_count}");
    println!("contactbook contacts={contact_count}");
    Ok(())
}
