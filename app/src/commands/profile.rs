//! Own-account commands
use agency_core::{ProfileUpdate, Result};

use super::users::UserInfo;
use crate::state::AppState;

pub fn whoami(state: &AppState) -> Result<UserInfo> {
    Ok(state.current_user()?.into())
}

pub fn update_profile(
    state: &AppState,
    name: Option<String>,
    phone: Option<String>,
    password: Option<String>,
) -> Result<UserInfo> {
    state.with_user(|agency, actor| {
        let update = ProfileUpdate {
            name: name.unwrap_or_else(|| actor.name.clone()),
            phone: phone.or_else(|| actor.phone.clone()),
            password,
        };
        Ok(agency.update_profile(actor, update)?.into())
    })
}
