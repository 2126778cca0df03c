//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the deployed migrations exactly; `diesel print-schema`
//! can regenerate them from a live database.

diesel::table! {
    /// Book categories.
    categories (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue books.
    books (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Title as shelved.
        name -> Varchar,
        /// Author as shelved.
        author -> Varchar,
        /// Owning category.
        category_id -> Uuid,
        /// Derived availability flag; true iff no open loan exists.
        available -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered users; email is the identity key.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Identity key, unique.
        email -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Loan records; never deleted, closed loans are history.
    loans (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Book on loan.
        book_id -> Uuid,
        /// User holding (or having held) the book.
        user_id -> Uuid,
        /// Pick-up timestamp.
        picked_at -> Timestamptz,
        /// Whether the book has been returned.
        dropped_off -> Bool,
        /// Return timestamp, set exactly when `dropped_off` flips.
        dropped_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(books -> categories (category_id));
diesel::joinable!(loans -> books (book_id));
diesel::joinable!(loans -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(categories, books, users, loans);
