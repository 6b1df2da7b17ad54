//! 订单流程集成测试
//!
//! 覆盖创建、修改、状态流转三条主路径:
//! - 总价 = Σ(单价 × 数量) + 配送费
//! - 被拒绝的订单不留下任何客户/订单写入
//! - 终态订单不可修改, 重复进入同一终态为幂等空操作

use comanda_core::db::repository;
use comanda_core::{Config, Engine, OrderError};
use shared::models::{
    BuyerInput, BuyerRef, FoodCreate, LineItemInput, OrderCreate, OrderSection, OrderStatus,
    OrderUpdate, PaymentMethod, ProposedAddress,
};
use tempfile::TempDir;

const RESTAURANT: &str = "rest-001";

async fn test_engine() -> (Engine, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("comanda.db");
    let config = Config::with_database_path(db_path.to_str().expect("Non-UTF8 temp path"));
    let engine = Engine::start(config).await.expect("Failed to start engine");
    (engine, dir)
}

async fn seed_food(engine: &Engine, restaurant_id: &str, name: &str, price: i64) -> i64 {
    repository::food::insert(
        &engine.db().pool,
        FoodCreate {
            restaurant_id: restaurant_id.to_string(),
            name: name.to_string(),
            price,
        },
    )
    .await
    .expect("Failed to seed food")
    .id
}

fn counter_order(line_items: Vec<LineItemInput>) -> OrderCreate {
    OrderCreate {
        restaurant_id: RESTAURANT.to_string(),
        line_items,
        buyer: BuyerInput {
            name: Some("Mesa 4".to_string()),
            ..Default::default()
        },
        addresses: vec![],
        selected_address_text: None,
        payment_method: PaymentMethod::Cash,
        section: OrderSection::Counter,
        comment: None,
    }
}

fn item(food_id: i64, quantity: i64) -> LineItemInput {
    LineItemInput { food_id, quantity }
}

#[tokio::test]
async fn counter_order_totals_and_numbering() {
    let (engine, _dir) = test_engine().await;
    let pollo = seed_food(&engine, RESTAURANT, "Pollo asado", 500).await;
    let pan = seed_food(&engine, RESTAURANT, "Pan", 300).await;

    let order = engine
        .orders()
        .create_order(counter_order(vec![item(pollo, 2), item(pan, 1)]))
        .await
        .expect("create failed");

    assert_eq!(order.order_number, 1);
    assert_eq!(order.status, OrderStatus::Preparing);
    assert_eq!(order.subtotal(), 1300);
    assert_eq!(order.delivery_cost, 0);
    assert_eq!(order.total, 1300);
    assert_eq!(order.buyer, BuyerRef::InlineName("Mesa 4".to_string()));
    assert_eq!(order.selected_address_text, None);

    // 第二单: 序号递增, 持久化后可读回同样内容
    let second = engine
        .orders()
        .create_order(counter_order(vec![item(pan, 1)]))
        .await
        .expect("second create failed");
    assert_eq!(second.order_number, 2);

    let reloaded = engine.orders().get_order(&order.id).await.expect("reload");
    assert_eq!(reloaded.total, 1300);
    assert_eq!(reloaded.line_items, order.line_items);
    assert_eq!(reloaded.buyer, order.buyer);
}

#[tokio::test]
async fn delivery_order_snapshots_customer_and_address() {
    let (engine, _dir) = test_engine().await;
    let pollo = seed_food(&engine, RESTAURANT, "Pollo asado", 500).await;
    let pan = seed_food(&engine, RESTAURANT, "Pan", 300).await;

    let order = engine
        .orders()
        .create_order(OrderCreate {
            restaurant_id: RESTAURANT.to_string(),
            line_items: vec![item(pollo, 2), item(pan, 1)],
            buyer: BuyerInput {
                name: Some("Ana".to_string()),
                phone: Some("600111222".to_string()),
                comment: None,
            },
            addresses: vec![ProposedAddress::new("Calle Mayor 1", 400)],
            selected_address_text: Some("Calle Mayor 1".to_string()),
            payment_method: PaymentMethod::Card,
            section: OrderSection::Delivery,
            comment: None,
        })
        .await
        .expect("create failed");

    // 500*2 + 300 + 400 配送费
    assert_eq!(order.total, 1700);
    assert_eq!(order.delivery_cost, 400);
    assert_eq!(
        order.selected_address_text.as_deref(),
        Some("Calle Mayor 1")
    );

    // 买家是客户引用, 且客户档案带上了地址
    let BuyerRef::CustomerRef(customer_id) = order.buyer else {
        panic!("expected a customer buyer, got {:?}", order.buyer);
    };
    let customer = engine
        .customers()
        .find_by_phone("600111222")
        .await
        .expect("lookup")
        .expect("customer should exist");
    assert_eq!(customer.id, customer_id);
    assert_eq!(customer.name, "Ana");
    assert_eq!(customer.addresses.len(), 1);
    assert_eq!(customer.addresses[0].text, "Calle Mayor 1");
    assert_eq!(customer.addresses[0].delivery_cost, 400);
}

#[tokio::test]
async fn rejected_order_writes_nothing() {
    let (engine, _dir) = test_engine().await;
    let pollo = seed_food(&engine, RESTAURANT, "Pollo asado", 500).await;
    // 同一菜品 id 属于另一家餐厅, 对 RESTAURANT 不可见
    let foreign = seed_food(&engine, "rest-other", "Sopa", 250).await;

    let err = engine
        .orders()
        .create_order(OrderCreate {
            restaurant_id: RESTAURANT.to_string(),
            line_items: vec![item(pollo, 1), item(foreign, 1)],
            buyer: BuyerInput {
                name: Some("Ana".to_string()),
                phone: Some("600111222".to_string()),
                comment: None,
            },
            addresses: vec![ProposedAddress::new("Calle Mayor 1", 400)],
            selected_address_text: Some("Calle Mayor 1".to_string()),
            payment_method: PaymentMethod::Cash,
            section: OrderSection::Delivery,
            comment: None,
        })
        .await
        .expect_err("foreign line item must be rejected");
    assert!(matches!(err, OrderError::ForeignLineItem { food_id } if food_id == foreign));

    // 订单没写入, 客户也没被创建
    let count = repository::order::count_by_restaurant(&engine.db().pool, RESTAURANT)
        .await
        .expect("count");
    assert_eq!(count, 0);
    let customer = engine
        .customers()
        .find_by_phone("600111222")
        .await
        .expect("lookup");
    assert!(customer.is_none());
}

#[tokio::test]
async fn create_rejects_empty_and_bad_quantities() {
    let (engine, _dir) = test_engine().await;
    let pollo = seed_food(&engine, RESTAURANT, "Pollo asado", 500).await;

    let err = engine
        .orders()
        .create_order(counter_order(vec![]))
        .await
        .expect_err("empty order must be rejected");
    assert!(matches!(err, OrderError::EmptyLineItems));

    let err = engine
        .orders()
        .create_order(counter_order(vec![item(pollo, 0)]))
        .await
        .expect_err("zero quantity must be rejected");
    assert!(matches!(err, OrderError::InvalidQuantity { quantity: 0, .. }));
}

#[tokio::test]
async fn unresolvable_selected_address_rejects_whole_upsert() {
    let (engine, _dir) = test_engine().await;
    let pollo = seed_food(&engine, RESTAURANT, "Pollo asado", 500).await;

    let err = engine
        .orders()
        .create_order(OrderCreate {
            restaurant_id: RESTAURANT.to_string(),
            line_items: vec![item(pollo, 1)],
            buyer: BuyerInput {
                name: Some("Ana".to_string()),
                phone: Some("600111222".to_string()),
                comment: None,
            },
            addresses: vec![ProposedAddress::new("Calle Mayor 1", 400)],
            selected_address_text: Some("Avenida Inexistente 9".to_string()),
            payment_method: PaymentMethod::Cash,
            section: OrderSection::Delivery,
            comment: None,
        })
        .await
        .expect_err("unresolvable selection must be rejected");
    assert!(matches!(err, OrderError::AddressNotAssociated(_)));

    // 整个 upsert 被拒绝: 提议的地址也没有落库
    let customer = engine
        .customers()
        .find_by_phone("600111222")
        .await
        .expect("lookup");
    assert!(customer.is_none());
}

#[tokio::test]
async fn selected_address_without_phone_is_rejected() {
    let (engine, _dir) = test_engine().await;
    let pollo = seed_food(&engine, RESTAURANT, "Pollo asado", 500).await;

    let mut input = counter_order(vec![item(pollo, 1)]);
    input.selected_address_text = Some("Calle Mayor 1".to_string());

    let err = engine
        .orders()
        .create_order(input)
        .await
        .expect_err("address without customer must be rejected");
    assert!(matches!(err, OrderError::AddressWithoutCustomer));
}

#[tokio::test]
async fn counter_lifecycle_complete_is_terminal_and_idempotent() {
    let (engine, _dir) = test_engine().await;
    let pollo = seed_food(&engine, RESTAURANT, "Pollo asado", 500).await;

    let order = engine
        .orders()
        .create_order(counter_order(vec![item(pollo, 1)]))
        .await
        .expect("create failed");

    let completed = engine
        .orders()
        .transition_order(&order.id, OrderStatus::Completed)
        .await
        .expect("complete failed");
    assert_eq!(completed.status, OrderStatus::Completed);

    // 重复进入同一终态是幂等空操作
    let again = engine
        .orders()
        .transition_order(&order.id, OrderStatus::Completed)
        .await
        .expect("repeat complete should be a no-op");
    assert_eq!(again.status, OrderStatus::Completed);

    // 终态之后内容与备注都锁死
    let err = engine
        .orders()
        .update_order(
            &order.id,
            OrderUpdate {
                line_items: Some(vec![item(pollo, 3)]),
                ..Default::default()
            },
        )
        .await
        .expect_err("terminal order must not be editable");
    assert!(matches!(
        err,
        OrderError::OrderNotEditable {
            status: OrderStatus::Completed
        }
    ));
    let err = engine
        .orders()
        .update_order(
            &order.id,
            OrderUpdate {
                comment: Some("tarde".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect_err("terminal comment edit must be rejected");
    assert!(matches!(err, OrderError::OrderNotEditable { .. }));
}

#[tokio::test]
async fn delivery_lifecycle_enforces_section_and_order() {
    let (engine, _dir) = test_engine().await;
    let pollo = seed_food(&engine, RESTAURANT, "Pollo asado", 500).await;

    let delivery = OrderCreate {
        restaurant_id: RESTAURANT.to_string(),
        line_items: vec![item(pollo, 1)],
        buyer: BuyerInput {
            name: Some("Ana".to_string()),
            phone: Some("600111222".to_string()),
            comment: None,
        },
        addresses: vec![ProposedAddress::new("Calle Mayor 1", 400)],
        selected_address_text: Some("Calle Mayor 1".to_string()),
        payment_method: PaymentMethod::Cash,
        section: OrderSection::Delivery,
        comment: None,
    };

    let order = engine
        .orders()
        .create_order(delivery.clone())
        .await
        .expect("create failed");

    // 不允许跳过 Sent
    let err = engine
        .orders()
        .transition_order(&order.id, OrderStatus::Delivered)
        .await
        .expect_err("skipping Sent must be rejected");
    assert!(matches!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Preparing,
            to: OrderStatus::Delivered
        }
    ));
    // Completed 属于柜台分区
    let err = engine
        .orders()
        .transition_order(&order.id, OrderStatus::Completed)
        .await
        .expect_err("counter-only transition must be rejected");
    assert!(matches!(err, OrderError::InvalidTransition { .. }));

    let sent = engine
        .orders()
        .transition_order(&order.id, OrderStatus::Sent)
        .await
        .expect("send failed");
    assert_eq!(sent.status, OrderStatus::Sent);

    // Sent 之后: 内容锁死, 备注仍可改, 总价不变
    let err = engine
        .orders()
        .update_order(
            &order.id,
            OrderUpdate {
                line_items: Some(vec![item(pollo, 5)]),
                ..Default::default()
            },
        )
        .await
        .expect_err("content edit after Sent must be rejected");
    assert!(matches!(
        err,
        OrderError::OrderNotEditable {
            status: OrderStatus::Sent
        }
    ));
    let commented = engine
        .orders()
        .update_order(
            &order.id,
            OrderUpdate {
                comment: Some("sin timbre, llamar".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("comment edit in Sent should succeed");
    assert_eq!(commented.comment.as_deref(), Some("sin timbre, llamar"));
    assert_eq!(commented.total, order.total);

    let delivered = engine
        .orders()
        .transition_order(&order.id, OrderStatus::Delivered)
        .await
        .expect("deliver failed");
    assert_eq!(delivered.status, OrderStatus::Delivered);

    // 终态不可逃逸
    let err = engine
        .orders()
        .transition_order(&order.id, OrderStatus::Preparing)
        .await
        .expect_err("leaving a terminal state must be rejected");
    assert!(matches!(err, OrderError::InvalidTransition { .. }));

    // 第二单验证 Sent 可取消
    let other = engine
        .orders()
        .create_order(delivery)
        .await
        .expect("second create failed");
    engine
        .orders()
        .transition_order(&other.id, OrderStatus::Sent)
        .await
        .expect("send failed");
    let cancelled = engine
        .orders()
        .transition_order(&other.id, OrderStatus::Cancelled)
        .await
        .expect("cancel failed");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn update_while_preparing_reprices_the_order() {
    let (engine, _dir) = test_engine().await;
    let pollo = seed_food(&engine, RESTAURANT, "Pollo asado", 500).await;
    let pan = seed_food(&engine, RESTAURANT, "Pan", 300).await;

    let order = engine
        .orders()
        .create_order(counter_order(vec![item(pollo, 1)]))
        .await
        .expect("create failed");
    assert_eq!(order.total, 500);

    let updated = engine
        .orders()
        .update_order(
            &order.id,
            OrderUpdate {
                line_items: Some(vec![item(pollo, 2), item(pan, 1)]),
                payment_method: Some(PaymentMethod::Card),
                ..Default::default()
            },
        )
        .await
        .expect("update failed");

    assert_eq!(updated.total, 1300);
    assert_eq!(updated.payment_method, PaymentMethod::Card);
    // 编号与创建时间不因修改而变
    assert_eq!(updated.order_number, order.order_number);
    assert_eq!(updated.created_at, order.created_at);

    let reloaded = engine.orders().get_order(&order.id).await.expect("reload");
    assert_eq!(reloaded.total, 1300);
    assert_eq!(reloaded.line_items.len(), 2);
}

#[tokio::test]
async fn customer_upsert_is_idempotent_for_same_address() {
    let (engine, _dir) = test_engine().await;
    let pollo = seed_food(&engine, RESTAURANT, "Pollo asado", 500).await;

    let delivery = |cost: i64| OrderCreate {
        restaurant_id: RESTAURANT.to_string(),
        line_items: vec![item(pollo, 1)],
        buyer: BuyerInput {
            name: Some("Ana".to_string()),
            phone: Some("600111222".to_string()),
            comment: None,
        },
        addresses: vec![ProposedAddress::new("Calle Mayor 1", cost)],
        selected_address_text: Some("Calle Mayor 1".to_string()),
        payment_method: PaymentMethod::Cash,
        section: OrderSection::Delivery,
        comment: None,
    };

    engine
        .orders()
        .create_order(delivery(400))
        .await
        .expect("first create failed");
    let first = engine
        .customers()
        .find_by_phone("600111222")
        .await
        .expect("lookup")
        .expect("customer should exist");
    assert_eq!(first.addresses.len(), 1);
    let address_id = first.addresses[0].id;

    // 同一文本重复提交: 不新增条目, id 稳定, 费用按最新值更新
    let order = engine
        .orders()
        .create_order(delivery(450))
        .await
        .expect("second create failed");
    assert_eq!(order.delivery_cost, 450);

    let second = engine
        .customers()
        .find_by_phone("600111222")
        .await
        .expect("lookup")
        .expect("customer should exist");
    assert_eq!(second.addresses.len(), 1);
    assert_eq!(second.addresses[0].id, address_id);
    assert_eq!(second.addresses[0].delivery_cost, 450);

    // 历史订单的快照不受后续改价影响
    let reloaded = engine.orders().get_order(&order.id).await.expect("reload");
    assert_eq!(reloaded.delivery_cost, 450);
}

#[tokio::test]
async fn order_numbers_are_scoped_per_restaurant() {
    let (engine, _dir) = test_engine().await;
    let pollo = seed_food(&engine, RESTAURANT, "Pollo asado", 500).await;
    let sopa = seed_food(&engine, "rest-other", "Sopa", 250).await;

    let first = engine
        .orders()
        .create_order(counter_order(vec![item(pollo, 1)]))
        .await
        .expect("create failed");
    let other = engine
        .orders()
        .create_order(OrderCreate {
            restaurant_id: "rest-other".to_string(),
            line_items: vec![item(sopa, 1)],
            buyer: BuyerInput::default(),
            addresses: vec![],
            selected_address_text: None,
            payment_method: PaymentMethod::Cash,
            section: OrderSection::Counter,
            comment: None,
        })
        .await
        .expect("create failed");

    // 两家餐厅各自从 1 开始
    assert_eq!(first.order_number, 1);
    assert_eq!(other.order_number, 1);
}
