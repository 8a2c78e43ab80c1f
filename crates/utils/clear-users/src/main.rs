//! # Clear Users Utility
//!
//! Deletes every account from the database, sessions included.
//!
//! **WARNING**: This is a destructive operation that cannot be undone.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package clear-users --bin clear_users
//! cargo run --package clear-users --bin clear_users -- --yes   # skip prompt
//! ```
//!
//! Uploaded media files are left on disk; only the account rows go away.

use lib_core::create_pool;
use lib_core::model::store::UserRepository;
use sqlx::query_as;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let skip_prompt = std::env::args().any(|arg| arg == "--yes");

    println!("============================================");
    println!("  Clear Users Utility");
    println!("============================================");
    println!();
    println!("WARNING: This will delete ALL user accounts,");
    println!("including their active sessions.");
    println!();

    println!("Connecting to database...");
    let pool = create_pool().await?;

    let user_count: (i64,) = query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await?;

    if user_count.0 == 0 {
        println!("No users found. Nothing to delete.");
        return Ok(());
    }

    println!("Found {} user(s) in the database.", user_count.0);
    println!();

    if !skip_prompt {
        print!("Are you sure you want to delete all users? (yes/no): ");
        io::stdout().flush()?;

        let mut confirmation = String::new();
        io::stdin().read_line(&mut confirmation)?;
        let confirmation = confirmation.trim().to_lowercase();

        if confirmation != "yes" && confirmation != "y" {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    println!("Deleting all users...");
    let deleted_count = UserRepository::delete_all(&pool).await?;

    println!("Successfully deleted {} user(s).", deleted_count);
    Ok(())
}
