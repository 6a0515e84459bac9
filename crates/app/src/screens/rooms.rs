//! Rooms screen, scoped to the selected establishment

use chrono::NaiveDate;
use uuid::Uuid;

use hotelier_core::models::list_entry::{normalize, ListEntry};
use hotelier_core::validation::validate_room;
use hotelier_core::{
    DeleteMode, FieldErrors, Room, RoomDraft, RoomFilter, RoomQuery, RoomStatistics, RoomStatus,
    RoomType,
};

use super::{CrudScreen, Resource};
use crate::api::{ApiResult, HotelApi};
use crate::notify::NoticeKind;

pub struct Rooms;

fn normalized_list(items: &[String]) -> Vec<String> {
    normalize(items.iter().map(|s| ListEntry::Plain(s.clone())))
}

impl Resource for Rooms {
    type Item = Room;
    type Draft = RoomDraft;
    type Filter = RoomFilter;

    const TITLE: &'static str = "Room";
    const SINGULAR: &'static str = "room";
    const PLURAL: &'static str = "rooms";

    fn id(item: &Room) -> Uuid {
        item.id
    }

    fn blank(selected: Option<Uuid>, _today: NaiveDate) -> RoomDraft {
        RoomDraft::new(selected.unwrap_or_default(), "", RoomType::default())
    }

    fn draft_of(item: &Room) -> RoomDraft {
        let mut draft = item.details.clone();
        draft.amenities = normalized_list(&draft.amenities);
        draft.images = normalized_list(&draft.images);
        draft
    }

    fn validate(draft: &RoomDraft, _current: Option<&Room>, _today: NaiveDate) -> FieldErrors {
        let mut errors = validate_room(draft);
        if draft.establishment_id.is_nil() {
            errors.insert("establishment_id", "Select an establishment first");
        }
        errors
    }

    async fn list<A: HotelApi>(api: &A, selected: Option<Uuid>) -> ApiResult<Vec<Room>> {
        match selected {
            Some(id) => api.list_rooms(RoomQuery::for_establishment(id)).await,
            None => Ok(Vec::new()),
        }
    }

    async fn create<A: HotelApi>(api: &A, mut draft: RoomDraft) -> ApiResult<Room> {
        draft.amenities = normalized_list(&draft.amenities);
        draft.images = normalized_list(&draft.images);
        api.create_room(draft).await
    }

    async fn update<A: HotelApi>(api: &A, id: Uuid, mut draft: RoomDraft) -> ApiResult<Room> {
        draft.amenities = normalized_list(&draft.amenities);
        draft.images = normalized_list(&draft.images);
        api.update_room(id, draft).await
    }

    async fn delete<A: HotelApi>(api: &A, id: Uuid, _mode: DeleteMode) -> ApiResult<()> {
        api.delete_room(id).await
    }
}

pub type RoomsScreen<A> = CrudScreen<Rooms, A>;

impl<A: HotelApi> CrudScreen<Rooms, A> {
    /// Quick status change from the list
    pub async fn set_status(&mut self, id: Uuid, status: RoomStatus) -> bool {
        self.row_action(
            id,
            "Room status updated",
            "Unable to change the room status",
            move |api| async move { api.set_room_status(id, status).await },
        )
        .await
    }

    /// Change the room type of the open form, resetting its price
    pub fn change_kind(&mut self, kind: RoomType) {
        self.edit("kind", |d| d.set_kind(kind));
    }

    pub fn toggle_amenity(&mut self, amenity: &str) {
        self.edit("amenities", |d| d.toggle_amenity(amenity));
    }

    /// Figures for the selected establishment
    pub async fn statistics(&self) -> Option<RoomStatistics> {
        let id = self.context().selected_establishment()?;
        match self.context().api().room_statistics(id).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                let message = e.user_message("Unable to load room statistics");
                self.context().notify(NoticeKind::Warning, &message);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::context;
    use hotelier_core::EstablishmentDraft;

    #[tokio::test]
    async fn test_rooms_follow_selected_establishment() {
        let (ctx, notices) = context();
        let hotel = ctx
            .api()
            .create_establishment(EstablishmentDraft::new("A", "1 rue", "75001", "Paris"))
            .await
            .unwrap();
        let mut screen = RoomsScreen::new(ctx.clone());

        // Nothing selected: no rooms and no form submission
        assert!(screen.load().await);
        assert!(screen.items().is_empty());
        screen.open_create();
        screen.edit("number", |d| d.number = "101".to_string());
        assert!(!screen.submit().await);
        assert!(screen.form().unwrap().errors.contains("establishment_id"));

        ctx.select_establishment(Some(hotel.id));
        screen.open_create();
        screen.edit("number", |d| d.number = "101".to_string());
        screen.change_kind(RoomType::Suite);
        assert_eq!(screen.form().unwrap().draft.price, 120.0);
        screen.toggle_amenity(" Minibar ");
        screen.toggle_amenity("Balcony");
        screen.toggle_amenity("Balcony");
        assert!(screen.submit().await);

        let room = &screen.items()[0];
        assert_eq!(room.details.amenities, vec!["Minibar".to_string()]);
        assert_eq!(notices.count(crate::notify::NoticeKind::Success), 1);
    }

    #[tokio::test]
    async fn test_duplicate_number_keeps_form() {
        let (ctx, notices) = context();
        let hotel = ctx
            .api()
            .create_establishment(EstablishmentDraft::new("A", "1 rue", "75001", "Paris"))
            .await
            .unwrap();
        ctx.select_establishment(Some(hotel.id));
        let mut screen = RoomsScreen::new(ctx);

        for _ in 0..2 {
            screen.open_create();
            screen.edit("number", |d| d.number = "7".to_string());
            screen.submit().await;
        }
        assert_eq!(screen.items().len(), 1);
        assert!(screen.form().is_some());
        assert_eq!(notices.count(crate::notify::NoticeKind::Error), 1);
    }

    #[tokio::test]
    async fn test_status_change_and_statistics() {
        let (ctx, _notices) = context();
        let hotel = ctx
            .api()
            .create_establishment(EstablishmentDraft::new("A", "1 rue", "75001", "Paris"))
            .await
            .unwrap();
        ctx.select_establishment(Some(hotel.id));
        let mut screen = RoomsScreen::new(ctx);

        for number in ["1", "2"] {
            screen.open_create();
            screen.edit("number", |d| d.number = number.to_string());
            screen.submit().await;
        }
        let id = screen.items()[0].id;
        assert!(screen.set_status(id, RoomStatus::Occupied).await);

        let stats = screen.statistics().await.unwrap();
        assert_eq!(stats.total_rooms, 2);
        assert_eq!(stats.occupied_rooms, 1);
        assert_eq!(stats.occupancy_rate, 50);
    }
}
