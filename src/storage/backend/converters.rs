use chrono::{DateTime, Utc};

use crate::storage::Link;
use migration::entities::link;

/// 将 Sea-ORM Model 转换为 Link
pub fn model_to_link(model: link::Model) -> Link {
    Link {
        code: model.code,
        url: model.url,
        click_count: model.click_count.max(0) as u64,
        last_clicked: model.last_clicked,
        created_at: model.created_at,
    }
}

/// ActiveModel for a brand-new row; `id` is left to the store.
pub fn new_link_active_model(code: &str, url: &str, now: DateTime<Utc>) -> link::ActiveModel {
    use sea_orm::ActiveValue::*;

    link::ActiveModel {
        id: NotSet,
        code: Set(code.to_string()),
        url: Set(url.to_string()),
        click_count: Set(0),
        last_clicked: Set(None),
        created_at: Set(now),
    }
}
