use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::{db::{self, DBResult}, models};

/////*============== USER QUERIES ==============*/
impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::User {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            username: row.get("username")?,
            email: row.get("email")?,
            last_login: row.get("last_login")?,
        })
    }
}

/// Returns the user with the username: `username`, if they exist.
pub fn query_user(connection: &Connection, username: &str) -> DBResult<Option<models::User>> {
    connection
        .prepare("SELECT username, email, last_login FROM Users WHERE username = :username")?
        .query(rusqlite::named_params! { ":username": username })?
        .next()?
        .map(|row| row.try_into())
        .transpose()
}

/// Inserts a new user.
///
/// Returns `false` without inserting anything if the username or the email is taken.
pub fn insert_user(connection: &Connection, user: &models::NewUser) -> DBResult<bool> {
    log::trace!("[insert_user] Inserting user {} into Users...", user.username);

    let query_params = rusqlite::named_params! {
            ":username": user.username,
            ":email":    user.email,
            ":password": user.password,
    };

    connection
        .prepare(
            "INSERT INTO Users ( username,  email,  password, last_login)
             VALUES            (:username, :email, :password, NULL)"
        )?
        .execute(query_params)
        .map_or_else(db::swallow_constraint_violation, |_| Ok(true))
        .inspect(|&added| {
            if added {
                log::info!("User {} has been registered.", user.username);
            }
        })
}

/// Return whether `credentials` name an existing user with a matching password.
pub fn check_password(connection: &Connection, credentials: &models::Credentials) -> DBResult<bool> {
    log::trace!("[check_password] Checking credentials for {}...", credentials.username);

    let stored: Option<String> = connection
        .prepare("SELECT password FROM Users WHERE username = :username")?
        .query(rusqlite::named_params! { ":username": credentials.username })?
        .next()?
        .map(|row| row.get("password"))
        .transpose()?;

    Ok(stored.is_some_and(|password| password == credentials.password))
}

/// Stamps `username`'s last_login with `at`.
pub fn update_last_login(connection: &Connection, username: &str, at: NaiveDateTime) -> DBResult<()> {
    connection
        .prepare("UPDATE Users SET last_login = :last_login WHERE username = :username")?
        .execute(rusqlite::named_params! { ":username": username, ":last_login": at })
        .inspect_err(|err| log::error!("[update_last_login] Could not update user '{username}': {err}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> models::NewUser {
        models::NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: String::from("hunter2"),
        }
    }

    fn credentials(username: &str, password: &str) -> models::Credentials {
        models::Credentials { username: username.to_string(), password: password.to_string() }
    }

    #[test]
    fn insert_user_rejects_taken_username_or_email() {
        let connection = db::test_connection();

        assert!(insert_user(&connection, &new_user("alice", "alice@example.com")).unwrap());
        assert!(!insert_user(&connection, &new_user("alice", "other@example.com")).unwrap());
        assert!(!insert_user(&connection, &new_user("bob", "alice@example.com")).unwrap());

        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM Users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn check_password_compares_stored_password() {
        let connection = db::test_connection();
        insert_user(&connection, &new_user("alice", "alice@example.com")).unwrap();

        assert!(check_password(&connection, &credentials("alice", "hunter2")).unwrap());
        assert!(!check_password(&connection, &credentials("alice", "Hunter2")).unwrap());
        assert!(!check_password(&connection, &credentials("mallory", "hunter2")).unwrap());
    }

    #[test]
    fn update_last_login_is_visible_through_query_user() {
        let connection = db::test_connection();
        insert_user(&connection, &new_user("alice", "alice@example.com")).unwrap();
        assert_eq!(query_user(&connection, "alice").unwrap().unwrap().last_login, None);

        let at = db::now();
        update_last_login(&connection, "alice", at).unwrap();

        let user = query_user(&connection, "alice").unwrap().unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.last_login, Some(at));
    }

    #[test]
    fn query_user_returns_none_for_unknown_user() {
        let connection = db::test_connection();
        assert!(query_user(&connection, "nobody").unwrap().is_none());
    }
}
