//! In-memory repositories and an application builder for integration tests.
//!
//! The repositories keep everything behind one mutex so order placement
//! applies its reservation atomically, like the database transaction does.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use tower::ServiceExt;

use rent_n_go::config::Config;
use rent_n_go::domain::{
    Car, Document, DocumentKind, Driver, NewOrder, NewUser, Order, OrderDetails, OrderStatus,
    hash_password, Reservation, Tour, User, UserRole, CAR_UNAVAILABLE, DRIVER_UNAVAILABLE,
};
use rent_n_go::errors::{AppError, AppResult};
use rent_n_go::infra::{
    DocumentRepository, FileStorage, FleetRepository, OrderRepository, SessionBackend,
    RefreshGrant, TokenRepository, UnitOfWork, UserRepository,
};
use rent_n_go::services::{Authenticator, DocumentManager, OrderManager};
use rent_n_go::{create_router, AppState};

pub const JWT_SECRET: &str = "integration-test-secret-that-is-long-enough";
pub const ADMIN_EMAIL: &str = "admin@mail.com";
pub const CUSTOMER_EMAIL: &str = "budi@mail.com";
pub const OTHER_CUSTOMER_EMAIL: &str = "sari@mail.com";
pub const PASSWORD: &str = "secret123";

#[derive(Default)]
struct State {
    users: Vec<User>,
    cars: HashMap<i32, Car>,
    drivers: HashMap<i32, Driver>,
    tours: HashMap<i32, Tour>,
    orders: Vec<Order>,
    documents: Vec<Document>,
    tokens: HashMap<String, RefreshGrant>,
}

/// Every repository over one shared in-memory state
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_user(&self, email: &str, role: UserRole) -> User {
        let mut state = self.lock();
        let now = Utc::now();
        let user = User {
            id: state.users.len() as i32 + 1,
            name: email.split('@').next().unwrap_or_default().to_string(),
            email: email.to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            role,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        user
    }

    pub fn add_car(&self, car: Car) {
        self.lock().cars.insert(car.id, car);
    }

    pub fn add_driver(&self, driver: Driver) {
        self.lock().drivers.insert(driver.id, driver);
    }

    pub fn add_tour(&self, tour: Tour) {
        self.lock().tours.insert(tour.id, tour);
    }

    pub fn car_stock(&self, id: i32) -> Option<i32> {
        self.lock().cars.get(&id).map(|car| car.stock)
    }

    pub fn driver_available(&self, id: i32) -> Option<bool> {
        self.lock().drivers.get(&id).map(|driver| driver.is_available)
    }

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }
}

fn take_car(state: &mut State, car_id: i32) -> AppResult<()> {
    match state.cars.get_mut(&car_id) {
        Some(car) if car.stock > 0 => {
            car.stock -= 1;
            Ok(())
        }
        _ => Err(AppError::bad_request(CAR_UNAVAILABLE)),
    }
}

fn book_driver(state: &mut State, driver_id: i32) -> AppResult<()> {
    match state.drivers.get_mut(&driver_id) {
        Some(driver) if driver.is_available => {
            driver.is_available = false;
            Ok(())
        }
        _ => Err(AppError::bad_request(DRIVER_UNAVAILABLE)),
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::bad_request("User already exists"));
        }
        let now = Utc::now();
        let user = User {
            id: state.users.len() as i32 + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl FleetRepository for MemoryStore {
    async fn find_car(&self, id: i32) -> AppResult<Option<Car>> {
        Ok(self.lock().cars.get(&id).cloned())
    }

    async fn find_driver(&self, id: i32) -> AppResult<Option<Driver>> {
        Ok(self.lock().drivers.get(&id).cloned())
    }

    async fn find_tour(&self, id: i32) -> AppResult<Option<Tour>> {
        Ok(self.lock().tours.get(&id).cloned())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn has_active_order(&self, user_id: i32) -> AppResult<bool> {
        Ok(self
            .lock()
            .orders
            .iter()
            .any(|o| o.user_id == user_id && o.status.is_active()))
    }

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<OrderDetails>> {
        let state = self.lock();
        let mut orders: Vec<OrderDetails> = state
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .map(|o| OrderDetails {
                order: o.clone(),
                car: o.car_id.and_then(|id| state.cars.get(&id).cloned()),
                driver: o.driver_id.and_then(|id| state.drivers.get(&id).cloned()),
                tour: o.tour_id.and_then(|id| state.tours.get(&id).cloned()),
            })
            .collect();
        orders.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));
        Ok(orders)
    }

    async fn place(&self, order: NewOrder) -> AppResult<Order> {
        let mut state = self.lock();

        let (car_id, driver_id) = match order.reservation {
            Reservation::Car { car_id } => {
                take_car(&mut state, car_id)?;
                (Some(car_id), None)
            }
            Reservation::Driver { driver_id, car_id } => {
                if let Some(car_id) = car_id {
                    if state.cars.get(&car_id).map_or(true, |car| car.stock <= 0) {
                        return Err(AppError::bad_request(CAR_UNAVAILABLE));
                    }
                }
                book_driver(&mut state, driver_id)?;
                if let Some(car_id) = car_id {
                    take_car(&mut state, car_id)?;
                }
                (car_id, Some(driver_id))
            }
        };

        let now = Utc::now();
        let placed = Order {
            id: state.orders.len() as i32 + 1,
            user_id: order.user_id,
            car_id,
            driver_id,
            tour_id: None,
            total_amount: order.total_amount,
            status: OrderStatus::Pending,
            start_period: order.start_period,
            end_period: order.end_period,
            payment_method: order.payment_method,
            created_at: now,
            updated_at: now,
        };
        state.orders.push(placed.clone());
        Ok(placed)
    }
}

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn find(&self, user_id: i32, kind: DocumentKind) -> AppResult<Option<Document>> {
        Ok(self
            .lock()
            .documents
            .iter()
            .find(|d| d.user_id == user_id && d.kind == kind)
            .cloned())
    }

    async fn upsert(
        &self,
        user_id: i32,
        kind: DocumentKind,
        file_path: String,
    ) -> AppResult<Document> {
        let mut state = self.lock();
        let now = Utc::now();
        let next_id = state.documents.len() as i32 + 1;

        if let Some(existing) = state
            .documents
            .iter_mut()
            .find(|d| d.user_id == user_id && d.kind == kind)
        {
            existing.file_path = file_path;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let document = Document {
            id: next_id,
            user_id,
            kind,
            file_path,
            created_at: now,
            updated_at: now,
        };
        state.documents.push(document.clone());
        Ok(document)
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn store(&self, user_id: i32, token: String, expires_at: DateTime<Utc>) -> AppResult<()> {
        self.lock().tokens.insert(
            token,
            RefreshGrant {
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn consume(&self, token: &str) -> AppResult<Option<RefreshGrant>> {
        Ok(self.lock().tokens.remove(token))
    }
}

/// UnitOfWork handing out the shared in-memory store
pub struct MemoryUnitOfWork(pub Arc<MemoryStore>);

impl UnitOfWork for MemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.0.clone()
    }

    fn fleet(&self) -> Arc<dyn FleetRepository> {
        self.0.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.0.clone()
    }

    fn documents(&self) -> Arc<dyn DocumentRepository> {
        self.0.clone()
    }

    fn tokens(&self) -> Arc<dyn TokenRepository> {
        self.0.clone()
    }
}

/// A fully wired router over in-memory state
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub public: tempfile::TempDir,
}

impl TestApp {
    /// Seeded with one admin, two customers, a car, a driver and a tour.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        store.add_user(ADMIN_EMAIL, UserRole::Admin);
        store.add_user(CUSTOMER_EMAIL, UserRole::Customer);
        store.add_user(OTHER_CUSTOMER_EMAIL, UserRole::Customer);
        store.add_car(Car {
            id: 5,
            name: "Avanza".to_string(),
            brand: "Toyota".to_string(),
            seats: 7,
            price_per_day: 350_000,
            stock: 1,
        });
        store.add_driver(Driver {
            id: 3,
            name: "Joko".to_string(),
            phone: "+62811000111".to_string(),
            price_per_day: 200_000,
            is_available: true,
        });
        store.add_tour(Tour {
            id: 7,
            name: "Bromo Sunrise".to_string(),
            destination: "Probolinggo".to_string(),
            price: 1_500_000,
        });

        let public = tempfile::tempdir().unwrap();
        let mut config = Config::default().with_jwt_secret(JWT_SECRET);
        config.public_path = public.path().to_path_buf();
        config.order_timeout = Duration::from_secs(5);

        let uow = Arc::new(MemoryUnitOfWork(store.clone()));
        let state = AppState::new(
            Arc::new(Authenticator::new(uow.clone(), config.clone())),
            Arc::new(OrderManager::new(uow.clone(), config.order_timeout)),
            Arc::new(DocumentManager::new(uow, FileStorage::new(public.path()))),
            SessionBackend::memory(),
            config,
        );

        Self {
            router: create_router(state),
            store,
            public,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Log a customer in and return the access token
    pub async fn access_token(&self, email: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/auth/login",
                None,
                serde_json::json!({ "email": email, "password": PASSWORD }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        body["access_token"].as_str().unwrap().to_string()
    }
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn text_body(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
