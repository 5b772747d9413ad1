//! Idempotent MySQL schema bootstrap, run at every boot.

use sqlx::MySqlPool;

use crate::error::StorageError;

const CORE_TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            username VARCHAR(64) NOT NULL,
            email VARCHAR(255) NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            nickname VARCHAR(64) NULL,
            avatar_url VARCHAR(512) NULL,
            bio TEXT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            UNIQUE KEY uq_users_username (username),
            UNIQUE KEY uq_users_email (email),
            UNIQUE KEY uq_users_nickname (nickname)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
    (
        "ai_games",
        r#"
        CREATE TABLE IF NOT EXISTS ai_games (
            game_id VARCHAR(128) PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            genre VARCHAR(64) NULL,
            difficulty VARCHAR(32) NULL,
            metadata JSON NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
    (
        "ai_characters",
        r#"
        CREATE TABLE IF NOT EXISTS ai_characters (
            character_id VARCHAR(128) PRIMARY KEY,
            game_id VARCHAR(128) NOT NULL,
            user_id VARCHAR(128) NOT NULL,
            name VARCHAR(128) NOT NULL,
            class VARCHAR(64) NULL,
            level INT NOT NULL DEFAULT 1,
            stats JSON NULL,
            inventory JSON NULL,
            avatar VARCHAR(512) NULL,
            health INT NOT NULL DEFAULT 100,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            KEY idx_ai_characters_user (user_id),
            CONSTRAINT fk_ai_characters_game FOREIGN KEY (game_id)
                REFERENCES ai_games (game_id) ON DELETE CASCADE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
    (
        "ai_sessions",
        r#"
        CREATE TABLE IF NOT EXISTS ai_sessions (
            session_id VARCHAR(128) PRIMARY KEY,
            game_id VARCHAR(128) NOT NULL,
            user_id VARCHAR(128) NOT NULL,
            character_id VARCHAR(128) NOT NULL,
            status ENUM('active', 'ended') NOT NULL DEFAULT 'active',
            started_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            ended_at TIMESTAMP NULL DEFAULT NULL,
            KEY idx_ai_sessions_user (user_id, started_at),
            CONSTRAINT fk_ai_sessions_game FOREIGN KEY (game_id)
                REFERENCES ai_games (game_id) ON DELETE CASCADE,
            CONSTRAINT fk_ai_sessions_character FOREIGN KEY (character_id)
                REFERENCES ai_characters (character_id) ON DELETE CASCADE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
    (
        "ai_session_progress",
        r#"
        CREATE TABLE IF NOT EXISTS ai_session_progress (
            session_id VARCHAR(128) PRIMARY KEY,
            chapter VARCHAR(128) NULL,
            scene VARCHAR(128) NULL,
            state JSON NULL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            CONSTRAINT fk_ai_progress_session FOREIGN KEY (session_id)
                REFERENCES ai_sessions (session_id) ON DELETE CASCADE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
    (
        "ai_progress_checkpoints",
        r#"
        CREATE TABLE IF NOT EXISTS ai_progress_checkpoints (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            session_id VARCHAR(128) NOT NULL,
            label VARCHAR(255) NOT NULL,
            state JSON NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            KEY idx_ai_checkpoints_session (session_id, id),
            CONSTRAINT fk_ai_checkpoints_session FOREIGN KEY (session_id)
                REFERENCES ai_sessions (session_id) ON DELETE CASCADE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
    (
        "ai_messages",
        r#"
        CREATE TABLE IF NOT EXISTS ai_messages (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            session_id VARCHAR(128) NOT NULL,
            role ENUM('system', 'assistant', 'user') NOT NULL,
            type ENUM('chat', 'dice', 'combat') NOT NULL DEFAULT 'chat',
            content MEDIUMTEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            KEY idx_ai_messages_session (session_id, id),
            CONSTRAINT fk_ai_messages_session FOREIGN KEY (session_id)
                REFERENCES ai_sessions (session_id) ON DELETE CASCADE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
    (
        "ai_conversation_logs",
        r#"
        CREATE TABLE IF NOT EXISTS ai_conversation_logs (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            game_id VARCHAR(128) NOT NULL,
            character_id VARCHAR(128) NOT NULL,
            user_id VARCHAR(128) NOT NULL,
            title VARCHAR(255) NOT NULL,
            messages JSON NOT NULL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            UNIQUE KEY uq_ai_conversation_pair (game_id, character_id),
            KEY idx_ai_conversation_user (user_id, updated_at),
            CONSTRAINT fk_ai_conversation_game FOREIGN KEY (game_id)
                REFERENCES ai_games (game_id) ON DELETE CASCADE,
            CONSTRAINT fk_ai_conversation_character FOREIGN KEY (character_id)
                REFERENCES ai_characters (character_id) ON DELETE CASCADE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
    (
        "games",
        r#"
        CREATE TABLE IF NOT EXISTS games (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            description TEXT NULL,
            genre VARCHAR(64) NULL,
            cover_image VARCHAR(512) NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
    (
        "characters",
        r#"
        CREATE TABLE IF NOT EXISTS characters (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            user_id BIGINT NOT NULL,
            game_id BIGINT NOT NULL,
            name VARCHAR(128) NOT NULL,
            class VARCHAR(64) NULL,
            attributes JSON NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            KEY idx_characters_user (user_id, game_id),
            CONSTRAINT fk_characters_game FOREIGN KEY (game_id)
                REFERENCES games (id) ON DELETE CASCADE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
    (
        "progress",
        r#"
        CREATE TABLE IF NOT EXISTS progress (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            user_id BIGINT NOT NULL,
            game_id BIGINT NOT NULL,
            character_id BIGINT NULL,
            chapter VARCHAR(128) NULL,
            data JSON NULL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            UNIQUE KEY uq_progress_slot (user_id, game_id),
            CONSTRAINT fk_progress_game FOREIGN KEY (game_id)
                REFERENCES games (id) ON DELETE CASCADE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
    (
        "game_titles",
        r#"
        CREATE TABLE IF NOT EXISTS game_titles (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            user_id BIGINT NOT NULL,
            game_id BIGINT NOT NULL,
            title VARCHAR(255) NOT NULL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            UNIQUE KEY uq_game_titles_slot (user_id, game_id),
            CONSTRAINT fk_game_titles_game FOREIGN KEY (game_id)
                REFERENCES games (id) ON DELETE CASCADE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#,
    ),
];

/// Create every table the backend uses if it does not exist yet.
///
/// Order matters: referenced tables come before the tables holding the keys.
pub async fn ensure_core_tables(pool: &MySqlPool) -> Result<(), StorageError> {
    for (name, ddl) in CORE_TABLES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| StorageError::Migration(format!("creating {name}: {e}")))?;
        tracing::debug!(table = name, "table ensured");
    }
    tracing::info!(tables = CORE_TABLES.len(), "core tables ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CORE_TABLES;

    #[test]
    fn test_every_statement_is_idempotent() {
        for (name, ddl) in CORE_TABLES {
            assert!(ddl.contains("CREATE TABLE IF NOT EXISTS"), "{name} must be idempotent");
            assert!(ddl.contains(name), "{name} DDL must create that table");
        }
    }

    #[test]
    fn test_referenced_tables_come_first() {
        let position = |table: &str| {
            CORE_TABLES.iter().position(|(name, _)| *name == table).unwrap()
        };
        for (idx, (_, ddl)) in CORE_TABLES.iter().enumerate() {
            for (referenced, _) in CORE_TABLES {
                if ddl.contains(&format!("REFERENCES {referenced} ")) {
                    assert!(position(referenced) < idx);
                }
            }
        }
    }
}
