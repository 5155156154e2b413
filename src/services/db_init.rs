use mongodb::{
    bson::doc,
    options::IndexOptions,
    Database, IndexModel,
};

use crate::error::Result;

pub async fn ensure_indexes(db: &Database) -> Result<()> {
    // users: unique email
    {
        let col = db.collection::<mongodb::bson::Document>("users");
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None).await?;
    }

    // holdings: one row per (user_id, symbol)
    {
        let col = db.collection::<mongodb::bson::Document>("holdings");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "symbol": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None).await?;
    }

    // positions: one row per (user_id, symbol), matching the reconciler's lookup key
    {
        let col = db.collection::<mongodb::bson::Document>("positions");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "symbol": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None).await?;
    }

    // orders: query by user quickly and sort by created_at desc
    {
        let col = db.collection::<mongodb::bson::Document>("orders");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .build();
        col.create_index(model, None).await?;

        let model = IndexModel::builder()
            .keys(doc! { "order_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        col.create_index(model, None).await?;

        // idempotency probe on order create
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "payment_intent_id": 1 })
            .options(IndexOptions::builder().sparse(true).build())
            .build();
        col.create_index(model, None).await?;
    }

    // funds: per-user history, and at most one entry per payment intent
    {
        let col = db.collection::<mongodb::bson::Document>("funds");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .build();
        col.create_index(model, None).await?;

        let model = IndexModel::builder()
            .keys(doc! { "payment_intent_id": 1 })
            .options(IndexOptions::builder().unique(true).sparse(true).build())
            .build();
        col.create_index(model, None).await?;
    }

    // watchlist: one row per (user_id, symbol)
    {
        let col = db.collection::<mongodb::bson::Document>("watchlist");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "symbol": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        let _ = col.create_index(model, None).await;
    }

    Ok(())
}
