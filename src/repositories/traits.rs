//! Common repository traits
//!
//! This module defines generic interfaces for database operations.
//! Every method receives the connection to run on, so the same repository call
//! works on a pooled connection or inside an open transaction (`&mut *tx`).

use super::DbConnection;

/// Trait for creating new entities in the database
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the database)
/// * `CreateDTO` - DTO for creation (without ID, will be automatically generated)
pub trait Create<Entity, CreateDTO> {
    /// Creates a new entity in the database
    ///
    /// # Returns
    /// * `Ok(Entity)` - Created entity with ID assigned by the database
    /// * `Err(sqlx::Error)` - Error during insertion (unique violations included)
    async fn create(&self, conn: &mut DbConnection, data: &CreateDTO)
    -> Result<Entity, sqlx::Error>;
}

/// Trait for reading a single entity by primary key
///
/// # Type Parameters
/// * `Entity` - Type of the entity to read
/// * `Id` - Type of the primary key (e.g. `i32`, `(i32, i32)`)
pub trait Read<Entity, Id> {
    /// Reads an entity from the database by its primary key
    ///
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    /// * `Err(sqlx::Error)` - Error during reading
    async fn read(&self, conn: &mut DbConnection, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Trait for reading multiple entities by list of primary keys
pub trait ReadMany<Entity, Id> {
    /// Reads multiple entities from the database by their primary keys
    ///
    /// # Note
    /// Entities are returned in the order they are found in the database,
    /// which may not match the order of the provided IDs.
    async fn read_many(
        &self,
        conn: &mut DbConnection,
        ids: &[Id],
    ) -> Result<Vec<Entity>, sqlx::Error>;
}

/// Trait for updating existing entities
///
/// # Type Parameters
/// * `Entity` - Type of the updated entity
/// * `UpdateDTO` - DTO for updating
/// * `Id` - Type of the primary key
pub trait Update<Entity, UpdateDTO, Id> {
    /// Updates an existing entity in the database
    ///
    /// # Returns
    /// * `Ok(Entity)` - Updated entity
    /// * `Err(sqlx::Error)` - Error during update (`RowNotFound` if the entity is missing)
    async fn update(
        &self,
        conn: &mut DbConnection,
        id: &Id,
        data: &UpdateDTO,
    ) -> Result<Entity, sqlx::Error>;
}

/// Trait for deleting entities
pub trait Delete<Id> {
    /// Deletes an entity from the database
    ///
    /// # Returns
    /// * `Ok(true)` - A row was deleted
    /// * `Ok(false)` - Nothing matched
    /// * `Err(sqlx::Error)` - Error during deletion
    async fn delete(&self, conn: &mut DbConnection, id: &Id) -> Result<bool, sqlx::Error>;
}
