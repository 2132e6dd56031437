//! Hash-password command

use clap::Args;

use crate::domain::salesperson::validate_password;
use crate::infrastructure::salesperson::{Argon2Hasher, PasswordHasher};

#[derive(Args, Debug)]
pub struct HashPasswordArgs {
    /// Plain-text password to hash
    pub password: String,
}

/// Print an Argon2 PHC string for the given password
pub fn run(args: HashPasswordArgs) -> anyhow::Result<()> {
    println!("{}", hash(&Argon2Hasher::new(), &args.password)?);
    Ok(())
}

fn hash(hasher: &dyn PasswordHasher, password: &str) -> anyhow::Result<String> {
    validate_password(password)?;
    Ok(hasher.hash(password)?)
}
