pub const USERS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS Users (
        username       TEXT        PRIMARY KEY,
        email          TEXT        NOT NULL,
        password       TEXT        NOT NULL,
        last_login     TIMESTAMP,

        UNIQUE (email)
    )";

pub const ELECTIONS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS Elections (
        id                 INTEGER     PRIMARY KEY,
        name               TEXT        NOT NULL,
        description        TEXT        NOT NULL,
        start_time         TIMESTAMP   NOT NULL,
        end_time           TIMESTAMP   NOT NULL,

        creator_username   TEXT        NOT NULL    REFERENCES Users(username),

        UNIQUE (name)
    )";

pub const CANDIDATES_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS Candidates (
        id             INTEGER     PRIMARY KEY,
        name           TEXT        NOT NULL,
        birth_date     TIMESTAMP   NOT NULL,
        occupation     TEXT        NOT NULL,
        program        TEXT        NOT NULL,

        election_id    INTEGER     NOT NULL    REFERENCES Elections(id),

        UNIQUE (election_id, name)
    )";

pub const VOTES_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS Votes (
        id             INTEGER     PRIMARY KEY,

        username       TEXT        NOT NULL    REFERENCES Users(username),
        election_id    INTEGER     NOT NULL    REFERENCES Elections(id),
        candidate_id   INTEGER     NOT NULL    REFERENCES Candidates(id),
        vote_time      TIMESTAMP   NOT NULL,

        UNIQUE (username, election_id)
    )";
