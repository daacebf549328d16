//! Data model properties checked against the repositories.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;

use sqlx::SqlitePool;

use little_lemon_core::{OrderStatus, Price, ReservationSlot, Slug, UserId};
use little_lemon_integration_tests::{create_user, migrated_pool};
use little_lemon_restaurant::db::{
    BookingRepository, CartRepository, CategoryRepository, MenuItemRepository,
    OrderItemRepository, OrderRepository, RepositoryError, UserRepository,
};
use little_lemon_restaurant::models::{
    MenuItem, NewBooking, NewCart, NewCategory, NewMenuItem, NewOrder, NewOrderItem, Order,
};

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn price(raw: &str) -> Price {
    Price::parse(raw).unwrap()
}

async fn menu_item(pool: &SqlitePool, slug: &str, title: &str) -> MenuItem {
    let category = CategoryRepository::new(pool)
        .create(&NewCategory {
            slug: Slug::parse(slug).unwrap(),
            title: slug.to_string(),
        })
        .await
        .unwrap();
    MenuItemRepository::new(pool)
        .create(&NewMenuItem {
            title: title.to_string(),
            price: price("5.00"),
            featured: false,
            category_id: category.id,
        })
        .await
        .unwrap()
}

async fn pending_order(pool: &SqlitePool, user_id: UserId) -> Order {
    OrderRepository::new(pool)
        .create(&NewOrder {
            user_id,
            delivery_crew_id: None,
            status: OrderStatus::Pending,
            total: price("10.00"),
            date: date("2023-01-15"),
        })
        .await
        .unwrap()
}

fn cart_line(user_id: UserId, item: &MenuItem) -> NewCart {
    NewCart {
        user_id,
        menuitem_id: item.id,
        quantity: 2,
        unit_price: price("5.00"),
        price: price("10.00"),
    }
}

fn order_line(order: &Order, item: &MenuItem) -> NewOrderItem {
    NewOrderItem {
        order_id: order.id,
        menuitem_id: item.id,
        quantity: 2,
        price: price("10.00"),
    }
}

#[tokio::test]
async fn test_booking_reads_back_unchanged() {
    let pool = migrated_pool().await;
    let repo = BookingRepository::new(&pool);

    let created = repo
        .create(&NewBooking {
            first_name: "John".to_string(),
            reservation_date: date("2023-01-15"),
            reservation_slot: ReservationSlot::new(10).unwrap(),
        })
        .await
        .unwrap();

    let stored = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(stored.reservation_date, date("2023-01-15"));
    assert_eq!(stored.reservation_slot.get(), 10);
    assert_eq!(stored.to_string(), "John");
}

#[tokio::test]
async fn test_menu_item_reports_its_category_title() {
    let pool = migrated_pool().await;
    let category = CategoryRepository::new(&pool)
        .create(&NewCategory {
            slug: Slug::parse("mains").unwrap(),
            title: "Mains".to_string(),
        })
        .await
        .unwrap();

    let items = MenuItemRepository::new(&pool);
    let item = items
        .create(&NewMenuItem {
            title: "Grilled Fish".to_string(),
            price: price("20.00"),
            featured: false,
            category_id: category.id,
        })
        .await
        .unwrap();

    let detail = items.get_detail(item.id).await.unwrap().unwrap();
    assert_eq!(detail.category.title, "Mains");
    assert_eq!(detail.item.to_string(), "Grilled Fish");
}

#[tokio::test]
async fn test_deleting_delivery_crew_keeps_order() {
    let pool = migrated_pool().await;
    let customer = create_user(&pool, "customer", "long enough password", false).await;
    let crew = create_user(&pool, "rider", "long enough password", false).await;

    let orders = OrderRepository::new(&pool);
    let order = orders
        .create(&NewOrder {
            user_id: customer.id,
            delivery_crew_id: Some(crew.id),
            status: OrderStatus::Pending,
            total: price("24.50"),
            date: date("2023-01-15"),
        })
        .await
        .unwrap();

    UserRepository::new(&pool).delete(crew.id).await.unwrap();

    let order = orders.get(order.id).await.unwrap().unwrap();
    assert_eq!(order.delivery_crew_id, None);
    assert_eq!(order.user_id, customer.id);
}

#[tokio::test]
async fn test_deleting_user_removes_their_carts_and_orders() {
    let pool = migrated_pool().await;
    let customer = create_user(&pool, "customer", "long enough password", false).await;
    let other = create_user(&pool, "other", "long enough password", false).await;
    let item = menu_item(&pool, "desserts", "Lemon Dessert").await;

    let carts = CartRepository::new(&pool);
    carts.create(&cart_line(customer.id, &item)).await.unwrap();
    carts.create(&cart_line(other.id, &item)).await.unwrap();
    let order = pending_order(&pool, customer.id).await;
    let kept = pending_order(&pool, other.id).await;
    let order_items = OrderItemRepository::new(&pool);
    order_items.create(&order_line(&order, &item)).await.unwrap();

    UserRepository::new(&pool).delete(customer.id).await.unwrap();

    let orders = OrderRepository::new(&pool);
    assert_eq!(carts.count().await.unwrap(), 1);
    assert_eq!(orders.count().await.unwrap(), 1);
    assert!(orders.get(order.id).await.unwrap().is_none());
    assert!(orders.get(kept.id).await.unwrap().is_some());
    assert_eq!(order_items.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_deleting_menu_item_removes_its_cart_and_order_lines() {
    let pool = migrated_pool().await;
    let customer = create_user(&pool, "customer", "long enough password", false).await;
    let dessert = menu_item(&pool, "desserts", "Lemon Dessert").await;
    let fish = menu_item(&pool, "mains", "Grilled Fish").await;

    let carts = CartRepository::new(&pool);
    carts.create(&cart_line(customer.id, &dessert)).await.unwrap();
    carts.create(&cart_line(customer.id, &fish)).await.unwrap();
    let order = pending_order(&pool, customer.id).await;
    let order_items = OrderItemRepository::new(&pool);
    order_items.create(&order_line(&order, &dessert)).await.unwrap();
    let fish_line = order_items.create(&order_line(&order, &fish)).await.unwrap();

    MenuItemRepository::new(&pool).delete(dessert.id).await.unwrap();

    assert_eq!(carts.count().await.unwrap(), 1);
    assert_eq!(order_items.count().await.unwrap(), 1);
    assert!(order_items.get(fish_line.id).await.unwrap().is_some());
    assert!(OrderRepository::new(&pool).get(order.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_second_order_line_for_same_item_is_rejected() {
    let pool = migrated_pool().await;
    let customer = create_user(&pool, "customer", "long enough password", false).await;
    let item = menu_item(&pool, "desserts", "Lemon Dessert").await;
    let order = pending_order(&pool, customer.id).await;
    let other_order = pending_order(&pool, customer.id).await;

    let order_items = OrderItemRepository::new(&pool);
    order_items.create(&order_line(&order, &item)).await.unwrap();

    let err = order_items.create(&order_line(&order, &item)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    order_items.create(&order_line(&other_order, &item)).await.unwrap();
    assert_eq!(order_items.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_second_cart_line_for_same_item_is_rejected() {
    let pool = migrated_pool().await;
    let customer = create_user(&pool, "customer", "long enough password", false).await;
    let category = CategoryRepository::new(&pool)
        .create(&NewCategory {
            slug: Slug::parse("desserts").unwrap(),
            title: "Desserts".to_string(),
        })
        .await
        .unwrap();
    let item = MenuItemRepository::new(&pool)
        .create(&NewMenuItem {
            title: "Lemon Dessert".to_string(),
            price: price("5.00"),
            featured: true,
            category_id: category.id,
        })
        .await
        .unwrap();

    let line = NewCart {
        user_id: customer.id,
        menuitem_id: item.id,
        quantity: 2,
        unit_price: price("5.00"),
        price: price("10.00"),
    };
    let carts = CartRepository::new(&pool);
    carts.create(&line).await.unwrap();

    let err = carts.create(&line).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
    assert_eq!(carts.count().await.unwrap(), 1);
}
