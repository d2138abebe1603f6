//! User and token management.

use crate::{
    db::{db::Db, users::Users},
    libs::{messages::Message, view::View},
    msg_bail_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user and issue its first API token
    Add { name: String },
    /// Issue another API token for an existing user
    Token { id: String },
    /// List users
    List,
}

pub fn cmd(command: UserCommand) -> Result<()> {
    let db = Db::new()?;
    let users = Users::new(&db.conn);

    match command {
        UserCommand::Add { name } => {
            let user = users.create(&name)?;
            let token = users.issue_token(&user.id)?;
            msg_success!(Message::UserCreated(user.name, user.id));
            msg_print!(Message::TokenIssued(token));
        }
        UserCommand::Token { id } => {
            if users.get(&id)?.is_none() {
                msg_bail_anyhow!(Message::UserNotFound(id));
            }
            msg_print!(Message::TokenIssued(users.issue_token(&id)?));
        }
        UserCommand::List => {
            let list = users.list()?;
            if list.is_empty() {
                msg_info!(Message::NoUsersFound);
            } else {
                View::users(&list)?;
            }
        }
    }
    Ok(())
}
