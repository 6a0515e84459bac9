//! Room categories screen

use chrono::NaiveDate;
use uuid::Uuid;

use hotelier_core::validation::validate_room_category;
use hotelier_core::{CategoryFilter, DeleteMode, FieldErrors, RoomCategory, RoomCategoryDraft};

use super::{CrudScreen, Resource};
use crate::api::{ApiResult, HotelApi};

pub struct Categories;

impl Resource for Categories {
    type Item = RoomCategory;
    type Draft = RoomCategoryDraft;
    type Filter = CategoryFilter;

    const TITLE: &'static str = "Room category";
    const SINGULAR: &'static str = "room category";
    const PLURAL: &'static str = "room categories";

    fn id(item: &RoomCategory) -> Uuid {
        item.id
    }

    fn blank(_selected: Option<Uuid>, _today: NaiveDate) -> RoomCategoryDraft {
        RoomCategoryDraft::new("", 1)
    }

    fn draft_of(item: &RoomCategory) -> RoomCategoryDraft {
        item.details.clone()
    }

    fn validate(
        draft: &RoomCategoryDraft,
        _current: Option<&RoomCategory>,
        _today: NaiveDate,
    ) -> FieldErrors {
        validate_room_category(draft)
    }

    async fn list<A: HotelApi>(api: &A, _selected: Option<Uuid>) -> ApiResult<Vec<RoomCategory>> {
        api.list_categories().await
    }

    async fn create<A: HotelApi>(api: &A, draft: RoomCategoryDraft) -> ApiResult<RoomCategory> {
        api.create_category(draft).await
    }

    async fn update<A: HotelApi>(
        api: &A,
        id: Uuid,
        draft: RoomCategoryDraft,
    ) -> ApiResult<RoomCategory> {
        api.update_category(id, draft).await
    }

    async fn delete<A: HotelApi>(api: &A, id: Uuid, _mode: DeleteMode) -> ApiResult<()> {
        api.delete_category(id).await
    }
}

pub type CategoriesScreen<A> = CrudScreen<Categories, A>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::context;

    #[tokio::test]
    async fn test_category_create_and_edit() {
        let (ctx, _notices) = context();
        let mut screen = CategoriesScreen::new(ctx);

        screen.open_create();
        screen.edit("capacity", |d| d.capacity = 0);
        assert!(!screen.submit().await);
        let errors = &screen.form().unwrap().errors;
        assert!(errors.contains("name") && errors.contains("capacity"));

        screen.edit("name", |d| d.name = "Family".to_string());
        screen.edit("capacity", |d| d.capacity = 4);
        assert!(screen.submit().await);

        let id = screen.items()[0].id;
        assert!(screen.open_edit(id));
        screen.edit("surface_area", |d| d.surface_area = Some(28.0));
        assert!(screen.submit().await);
        assert_eq!(screen.items()[0].details.surface_area, Some(28.0));
        assert_eq!(screen.summary(), "1 room category found");
    }
}
