use tempdir::TempDir;
use travel_tours_state::access::tours::{Tour, TourRecords};
use travel_tours_state::access::tour_cursor::TourListCursor;
use travel_tours_state::storage::sled_access::SledStorage;

fn tour(name: &str) -> Tour {
    Tour::new(name, "10 days", "https://cdn.example.com/tours/cover.jpg")
}

#[tokio::test]
async fn save_and_reopen() {
    let tmp_dir = TempDir::new("save_and_reopen").unwrap();
    {
        let store = SledStorage::open(tmp_dir.path().to_path_buf()).unwrap();
        let tours = store.get_tours();
        tours.add(vec![tour("Everest Base Camp Trek"), tour("Annapurna Circuit")]).unwrap();
    }

    let store = SledStorage::open(tmp_dir.path().to_path_buf()).unwrap();
    let mut cursor = TourListCursor::new(store.get_tours());
    let page = cursor.first_page().await;
    let names: Vec<String> = page.iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["Annapurna Circuit", "Everest Base Camp Trek"]);
    assert!(!cursor.state().has_more_data);
}

#[tokio::test]
async fn page_through_all_tours() {
    let tmp_dir = TempDir::new("page_through_all_tours").unwrap();
    let store = SledStorage::open(tmp_dir.path().to_path_buf()).unwrap();
    let tours = store.get_tours();
    let items = (0..23).map(|i| tour(format!("Tour {:02}", i).as_str())).collect();
    tours.add(items).unwrap();

    let mut cursor = TourListCursor::new(tours.clone());

    let first = cursor.first_page().await;
    assert_eq!(first.len(), 10);
    assert_eq!(first[0].name, "Tour 00");
    assert!(cursor.state().has_more_data);
    assert_eq!(cursor.state().current_page, 1);

    let second = cursor.page(2, 10).await;
    assert_eq!(second.len(), 10);
    assert_eq!(second[0].name, "Tour 10");
    assert!(cursor.state().has_more_data);

    let third = cursor.page(3, 10).await;
    assert_eq!(third.len(), 3);
    assert_eq!(third[2].name, "Tour 22");
    assert!(!cursor.state().has_more_data);
    assert_eq!(cursor.state().current_page, 3);

    assert!(cursor.page(4, 10).await.is_empty());

    // page 1 starts over
    let again = cursor.page(1, 10).await;
    assert_eq!(again[0].name, "Tour 00");
    assert!(cursor.state().has_more_data);
}

#[tokio::test]
async fn search_by_name_prefix() {
    let tmp_dir = TempDir::new("search_by_name_prefix").unwrap();
    let store = SledStorage::open(tmp_dir.path().to_path_buf()).unwrap();
    let tours = store.get_tours();
    tours.add(vec![tour("Everest Base Camp Trek"), tour("Annapurna Circuit")]).unwrap();

    let cursor = TourListCursor::new(tours);
    let found = cursor.search("Ever").await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Everest Base Camp Trek");
    assert_eq!(cursor.state().current_page, 0);
}

#[tokio::test]
async fn sessions_share_store() {
    let tmp_dir = TempDir::new("sessions_share_store").unwrap();
    let store = SledStorage::open(tmp_dir.path().to_path_buf()).unwrap();
    let tours = store.get_tours();
    let items = (0..15).map(|i| tour(format!("Tour {:02}", i).as_str())).collect();
    tours.add(items).unwrap();

    let mut hot = TourListCursor::new(tours.clone());
    let mut all = TourListCursor::new(tours.clone());

    let _ = hot.first_page().await;
    let _ = hot.page(2, 10).await;
    assert!(!hot.state().has_more_data);

    // another screen keeps its own position
    let page = all.page(1, 5).await;
    assert_eq!(page[0].name, "Tour 00");
    assert!(all.state().has_more_data);
}
