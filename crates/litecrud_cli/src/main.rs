//! Console smoke harness for the CRUD layer.
//!
//! # Responsibility
//! - Run create, read, update, read-all and delete against a store file.
//! - Print each step so the round trip can be checked by eye.
//!
//! Usage: `litecrud_cli [DB_PATH]` (defaults to `dados.db`).

use litecrud_core::{
    default_log_level, init_console_logging, EntityRepository, Product, RepoResult,
};
use log::warn;
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "dados.db";

fn main() -> ExitCode {
    if let Err(err) = init_console_logging(default_log_level()) {
        eprintln!("logging disabled: {err}");
    }

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    match run(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &str) -> RepoResult<()> {
    println!("==== LiteCrud console round trip ({db_path}) ====");

    let repo: EntityRepository<Product> = EntityRepository::new(db_path);

    let mut product = Product::new("Mechanical Keyboard", 299.90);
    let id = repo.create(&mut product)?;
    println!("Created product with id {id}");

    let Some(mut loaded) = repo.read(id)? else {
        warn!("event=console_read module=cli status=missing id={id}");
        println!("Product {id} not found right after create");
        return Ok(());
    };
    println!("Read: {} - ${:.2}", loaded.name, loaded.price);

    loaded.price = 259.90;
    if repo.update(&loaded)? {
        println!("Product updated");
    }

    println!();
    println!("Products:");
    for item in repo.read_all()? {
        println!("{}: {} - ${:.2}", item.id, item.name, item.price);
    }

    if repo.delete(id)? {
        println!("Product deleted");
    }

    Ok(())
}
