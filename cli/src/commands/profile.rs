use anyhow::Result;
use bazaar_client::container::{UpdateProfile, UploadAvatar};
use bazaar_client::{keys, Container, UserUpdate};

use super::{read_image, use_case, ProfileCommand};
use crate::output;

pub async fn run(container: &Container, command: ProfileCommand) -> Result<()> {
    let user = match command {
        ProfileCommand::Update { name, email, phone } => {
            use_case::<UpdateProfile>(container, keys::UPDATE_PROFILE)?
                .execute(UserUpdate { name, email, phone })
                .await?
        }
        ProfileCommand::Avatar { path } => {
            let image = read_image(&path).await?;
            use_case::<UploadAvatar>(container, keys::UPLOAD_AVATAR)?
                .execute(image)
                .await?
        }
    };

    output::user(&user);
    Ok(())
}
