//! Admin panel screens driven through the full router.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use chrono::NaiveDate;

use little_lemon_core::{OrderStatus, Price, Slug};
use little_lemon_integration_tests::{TestApp, create_user};
use little_lemon_restaurant::db::{
    CategoryRepository, MenuItemRepository, MenuRepository, OrderRepository,
};
use little_lemon_restaurant::models::{Category, NewCategory, NewMenu, NewMenuItem, NewOrder};

const STAFF_PASSWORD: &str = "lemon-staff-password";

async fn staff_app() -> TestApp {
    let mut app = TestApp::admin().await;
    create_user(&app.pool, "manager", STAFF_PASSWORD, true).await;
    app.login("manager", STAFF_PASSWORD).await;
    app
}

async fn category(app: &TestApp, slug: &str, title: &str) -> Category {
    CategoryRepository::new(&app.pool)
        .create(&NewCategory {
            slug: Slug::parse(slug).unwrap(),
            title: title.to_string(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_anonymous_visitor_is_sent_to_login() {
    let mut app = TestApp::admin().await;

    let response = app.get("/restaurant/menu/").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(response.location().unwrap().starts_with("/login/?next="));

    let login = app.get("/login/").await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.body.contains("name=\"password\""));
}

#[tokio::test]
async fn test_staff_login_reaches_dashboard() {
    let mut app = staff_app().await;

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Restaurant"));
    assert!(response.body.contains("/restaurant/booking/"));
    assert!(response.body.contains("/auth/user/"));
}

#[tokio::test]
async fn test_non_staff_login_is_refused() {
    let mut app = TestApp::admin().await;
    create_user(&app.pool, "diner", "diner-password", false).await;

    let response = app
        .post_form("/login/", &[("username", "diner"), ("password", "diner-password")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Please enter the correct username and password"));
    assert_eq!(app.get("/").await.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_change_list_search_filters_rows() {
    let mut app = staff_app().await;
    let menus = MenuRepository::new(&app.pool);
    for (name, price) in [("Greek Salad", "12.50"), ("Bruschetta", "7.50")] {
        menus
            .create(&NewMenu {
                name: name.to_string(),
                price: Price::parse(price).unwrap(),
                menu_item_description: String::new(),
            })
            .await
            .unwrap();
    }

    let response = app.get("/restaurant/menu/?q=salad").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Greek Salad"));
    assert!(!response.body.contains("Bruschetta"));

    let everything = app.get("/restaurant/menu/").await;
    assert!(everything.body.contains("Bruschetta"));
}

#[tokio::test]
async fn test_inline_status_edit_persists() {
    let mut app = staff_app().await;
    let customer = create_user(&app.pool, "customer", "customer-password", false).await;
    let pool = app.pool.clone();
    let orders = OrderRepository::new(&pool);
    let order = orders
        .create(&NewOrder {
            user_id: customer.id,
            delivery_crew_id: None,
            status: OrderStatus::Pending,
            total: Price::parse("24.50").unwrap(),
            date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
        })
        .await
        .unwrap();

    let field = format!("status-{}", order.id);
    let response = app
        .post_form("/restaurant/order/", &[(field.as_str(), "delivered")])
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/restaurant/order/"));
    let order = orders.get(order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);

    let list = app.get("/restaurant/order/").await;
    assert!(list.body.contains("1 order changed successfully."));
}

#[tokio::test]
async fn test_inline_title_edit_rejects_blank() {
    let mut app = staff_app().await;
    let mains = category(&app, "mains", "Mains").await;

    let field = format!("title-{}", mains.id);
    let response = app
        .post_form("/restaurant/category/", &[(field.as_str(), "  ")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("This field is required."));
    let stored = CategoryRepository::new(&app.pool).get(mains.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Mains");
}

#[tokio::test]
async fn test_deleting_referenced_category_is_refused() {
    let mut app = staff_app().await;
    let mains = category(&app, "mains", "Mains").await;
    MenuItemRepository::new(&app.pool)
        .create(&NewMenuItem {
            title: "Grilled Fish".to_string(),
            price: Price::parse("20.00").unwrap(),
            featured: false,
            category_id: mains.id,
        })
        .await
        .unwrap();

    let url = format!("/restaurant/category/{}/delete/", mains.id);
    let confirm = app.get(&url).await;
    assert_eq!(confirm.status, StatusCode::OK);
    assert!(confirm.body.contains("Mains"));

    let response = app.post_form(&url, &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Cannot delete category"));
    assert!(CategoryRepository::new(&app.pool).get(mains.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_unreferenced_category_is_deleted() {
    let mut app = staff_app().await;
    let drinks = category(&app, "drinks", "Drinks").await;

    let response = app
        .post_form(&format!("/restaurant/category/{}/delete/", drinks.id), &[])
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/restaurant/category/"));
    assert!(CategoryRepository::new(&app.pool).get(drinks.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_add_form_creates_booking() {
    let mut app = staff_app().await;

    let response = app
        .post_form(
            "/restaurant/booking/add/",
            &[
                ("first_name", "Maria"),
                ("reservation_date", "2023-01-15"),
                ("reservation_slot", "12"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/restaurant/booking/"));

    let list = app.get("/restaurant/booking/").await;
    assert!(list.body.contains("Maria"));
    assert!(list.body.contains("was added successfully."));
}
