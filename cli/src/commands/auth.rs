use anyhow::Result;
use bazaar_client::container::{GetCurrentUser, SignIn, SignOut, SignUp};
use bazaar_client::{keys, Container, SignUpData};

use super::use_case;
use crate::output;

pub async fn sign_up(
    container: &Container,
    name: String,
    email: String,
    password: String,
    phone: Option<String>,
) -> Result<()> {
    let session = use_case::<SignUp>(container, keys::SIGN_UP)?
        .execute(SignUpData {
            name,
            email,
            password,
            phone,
        })
        .await?;

    println!("Welcome to Bazaar, {}!", session.user.name);
    Ok(())
}

pub async fn sign_in(container: &Container, email: &str, password: &str) -> Result<()> {
    let session = use_case::<SignIn>(container, keys::SIGN_IN)?
        .execute(email, password)
        .await?;

    println!("Signed in as {}", session.user.email);
    Ok(())
}

pub async fn sign_out(container: &Container) -> Result<()> {
    use_case::<SignOut>(container, keys::SIGN_OUT)?
        .execute()
        .await?;

    println!("Signed out");
    Ok(())
}

pub async fn whoami(container: &Container, refresh: bool) -> Result<()> {
    let user = use_case::<GetCurrentUser>(container, keys::GET_CURRENT_USER)?
        .execute(refresh)
        .await?;

    output::user(&user);
    Ok(())
}
