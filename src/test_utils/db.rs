use rusqlite::Connection;

use crate::{
    auth::{Session, register_with_cost},
    db::initialize,
};

/// An initialized in-memory database.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Register `username` with a cheap password hash and return their session.
#[track_caller]
pub(crate) fn test_session(username: &str, connection: &Connection) -> Session {
    let user_id = register_with_cost(username, "hunter2", 4, connection)
        .expect("Could not register test user");

    Session::new(user_id)
}
