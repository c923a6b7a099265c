//! Tests of [`Command`]s and [`Query`]s against an in-memory store.

use std::{
    collections::HashMap,
    sync::Mutex,
};

use common::{
    operations::{By, Delete, Insert, Select, Update},
    Date, DateTime, Period,
};
use service::{
    command::{
        create_contract, create_user, edit_contract, generate_agreement,
        CreateContract, CreateUser, DeleteProduct, EditContract,
        GenerateAgreement,
    },
    document,
    domain::{contract, product, user, Contract, Product, User},
    infra::database,
    query, Command as _, Query as _, Service,
};
use tracerr::Traced;

/// In-memory store standing in for the production database.
#[derive(Debug, Default)]
struct InMemory {
    contracts: Mutex<HashMap<contract::Id, Contract>>,
    products: Mutex<HashMap<product::Id, Product>>,
    users: Mutex<HashMap<user::Id, User>>,
}

impl<IDs> database::Database<Select<By<HashMap<product::Id, Product>, IDs>>>
    for InMemory
where
    IDs: AsRef<[product::Id]>,
{
    type Ok = HashMap<product::Id, Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<product::Id, Product>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let products = self.products.lock().unwrap();
        Ok(by
            .into_inner()
            .as_ref()
            .iter()
            .filter_map(|id| products.get(id).map(|p| (*id, p.clone())))
            .collect())
    }
}

impl database::Database<Select<By<Option<Product>, product::Id>>> for InMemory {
    type Ok = Option<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Product>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Catalog view: removed `Product`s are not rentable.
        Ok(self
            .products
            .lock()
            .unwrap()
            .get(&by.into_inner())
            .filter(|p| p.deleted_at.is_none())
            .cloned())
    }
}

impl database::Database<Insert<Product>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(product): Insert<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self
            .products
            .lock()
            .unwrap()
            .insert(product.id, product);
        Ok(())
    }
}

impl database::Database<Delete<By<Product, product::Id>>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Product, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        if let Some(p) = self.products.lock().unwrap().get_mut(&by.into_inner())
        {
            p.deleted_at = Some(DateTime::now().coerce());
        }
        Ok(())
    }
}

impl<IDs> database::Database<Select<By<HashMap<user::Id, User>, IDs>>>
    for InMemory
where
    IDs: AsRef<[user::Id]>,
{
    type Ok = HashMap<user::Id, User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<user::Id, User>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let users = self.users.lock().unwrap();
        Ok(by
            .into_inner()
            .as_ref()
            .iter()
            .filter_map(|id| users.get(id).map(|u| (*id, u.clone())))
            .collect())
    }
}

impl database::Database<Select<By<Option<User>, user::Id>>> for InMemory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.users.lock().unwrap().get(&by.into_inner()).cloned())
    }
}

impl<'e> database::Database<Select<By<Option<User>, &'e user::Email>>>
    for InMemory
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'e user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }
}

impl database::Database<Insert<User>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self.users.lock().unwrap().insert(user.id, user);
        Ok(())
    }
}

impl database::Database<Select<By<Option<Contract>, contract::Id>>>
    for InMemory
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .contracts
            .lock()
            .unwrap()
            .get(&by.into_inner())
            .cloned())
    }
}

impl database::Database<Select<By<Vec<Contract>, Period>>> for InMemory {
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, Period>>,
    ) -> Result<Self::Ok, Self::Err> {
        let period = by.into_inner();
        let mut found = self
            .contracts
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.overlaps(&period))
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by_key(|c| c.start_date);
        Ok(found)
    }
}

impl database::Database<Insert<Contract>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self
            .contracts
            .lock()
            .unwrap()
            .insert(contract.id, contract);
        Ok(())
    }
}

impl database::Database<Update<Contract>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self
            .contracts
            .lock()
            .unwrap()
            .insert(contract.id, contract);
        Ok(())
    }
}

fn date(s: &str) -> Date {
    Date::from_calendar_str(s).unwrap()
}

fn service(dir: &std::path::Path) -> Service<InMemory> {
    Service::new(
        service::Config {
            documents: document::Config {
                dir: dir.to_path_buf(),
            },
        },
        InMemory::default(),
    )
}

fn excavator() -> Product {
    Product {
        id: product::Id::new(),
        object: product::Object::new("Excavator").unwrap(),
        brand: product::Brand::new("Komatsu").unwrap(),
        model: product::Model::new("PC210").unwrap(),
        quantity: 3,
        description: product::Description::new("21-ton tracked").unwrap(),
        precautions: product::Precautions::new("Check hydraulics").unwrap(),
        price_per_day: "100USD".parse().unwrap(),
        price_per_week: "600USD".parse().unwrap(),
        deposit: "1000USD".parse().unwrap(),
        created_at: DateTime::now().coerce(),
        deleted_at: None,
    }
}

fn renter(email: &str) -> User {
    User {
        id: user::Id::new(),
        first_name: user::FirstName::new("Jordan").unwrap(),
        last_name: user::LastName::new("Meyer").unwrap(),
        postal_address: user::PostalAddress::new("12 Quai des Chartrons")
            .unwrap(),
        city: user::City::new("Bordeaux").unwrap(),
        birth_date: date("1990-06-15").coerce(),
        phone: user::Phone::new("555-123-4567").unwrap(),
        email: user::Email::new(email).unwrap(),
        created_at: DateTime::now().coerce(),
    }
}

fn create_cmd(product_id: product::Id, user_id: user::Id) -> CreateContract {
    CreateContract {
        product_id,
        user_id,
        quantity: 2,
        rental_days: 10,
        state_before: contract::Condition::new("good").unwrap(),
        usage_date: date("2024-03-10").coerce(),
        period: Period::new(date("2024-03-10"), date("2024-03-19")).unwrap(),
    }
}

async fn seed(svc: &Service<InMemory>) -> (Product, User) {
    let product = excavator();
    let user = renter("jordan@example.com");
    svc.database()
        .execute(Insert(product.clone()))
        .await
        .unwrap();
    svc.database().execute(Insert(user.clone())).await.unwrap();
    (product, user)
}

#[tokio::test]
async fn create_contract_derives_total_from_prices() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let (product, user) = seed(&svc).await;

    let contract = svc
        .execute(create_cmd(product.id, user.id))
        .await
        .unwrap();

    // 10 days of 2 units: 2 * (600 + 3 * 100) = 1800.
    assert_eq!(contract.total_amount, "1800USD".parse().unwrap());
    assert!(contract.state_after.is_none());
    assert!(contract.retrieval_date.is_none());

    let stored: Option<Contract> = svc
        .database()
        .execute(Select(By::new(contract.id)))
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn create_contract_requires_existing_product_and_user() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let (product, user) = seed(&svc).await;

    let missing_product = svc
        .execute(create_cmd(product::Id::new(), user.id))
        .await
        .unwrap_err();
    assert!(matches!(
        missing_product.as_ref(),
        create_contract::ExecutionError::ProductNotExists(_),
    ));

    let missing_user = svc
        .execute(create_cmd(product.id, user::Id::new()))
        .await
        .unwrap_err();
    assert!(matches!(
        missing_user.as_ref(),
        create_contract::ExecutionError::UserNotExists(_),
    ));
}

#[tokio::test]
async fn create_contract_rejects_non_positive_amounts() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let (product, user) = seed(&svc).await;

    let mut cmd = create_cmd(product.id, user.id);
    cmd.quantity = 0;
    assert!(matches!(
        svc.execute(cmd).await.unwrap_err().as_ref(),
        create_contract::ExecutionError::InvalidQuantity(0),
    ));

    let mut cmd = create_cmd(product.id, user.id);
    cmd.rental_days = -1;
    assert!(matches!(
        svc.execute(cmd).await.unwrap_err().as_ref(),
        create_contract::ExecutionError::InvalidDuration(-1),
    ));
}

#[tokio::test]
async fn edit_contract_preserves_creation_time_and_recomputes_total() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let (product, user) = seed(&svc).await;

    let created = svc
        .execute(create_cmd(product.id, user.id))
        .await
        .unwrap();

    let edited = svc
        .execute(EditContract {
            id: created.id,
            product_id: product.id,
            user_id: user.id,
            quantity: 1,
            rental_days: 7,
            state_before: created.state_before.clone(),
            state_after: Some(contract::Condition::new("scratched").unwrap()),
            usage_date: created.usage_date,
            retrieval_date: Some(date("2024-03-17").coerce()),
            period: Period::new(date("2024-03-10"), date("2024-03-16"))
                .unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(edited.id, created.id);
    assert_eq!(edited.created_at, created.created_at);
    // 1 unit for exactly one week.
    assert_eq!(edited.total_amount, "600USD".parse().unwrap());
    assert_eq!(edited.phase(), contract::Phase::Closed);
}

#[tokio::test]
async fn edit_contract_requires_existing_contract() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let (product, user) = seed(&svc).await;

    let err = svc
        .execute(EditContract {
            id: contract::Id::new(),
            product_id: product.id,
            user_id: user.id,
            quantity: 1,
            rental_days: 7,
            state_before: contract::Condition::new("good").unwrap(),
            state_after: None,
            usage_date: date("2024-03-10").coerce(),
            retrieval_date: None,
            period: Period::new(date("2024-03-10"), date("2024-03-16"))
                .unwrap(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        edit_contract::ExecutionError::ContractNotExists(_),
    ));

    // Nothing was written behind the failure.
    assert!(svc.database().contracts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn deleted_product_disappears_from_catalog_but_not_from_history() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let (product, user) = seed(&svc).await;

    let contract = svc
        .execute(create_cmd(product.id, user.id))
        .await
        .unwrap();

    svc.execute(DeleteProduct { id: product.id }).await.unwrap();

    // No new rentals of the removed `Product`.
    let err = svc
        .execute(create_cmd(product.id, user.id))
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        create_contract::ExecutionError::ProductNotExists(_),
    ));

    // But the existing `Contract` still resolves it.
    let resolved = svc
        .execute(query::contracts::Overlapping {
            period: Period::new(date("2024-03-01"), date("2024-03-31"))
                .unwrap(),
        })
        .await
        .unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].contract.id, contract.id);
    assert_eq!(resolved[0].product.id, product.id);
}

#[tokio::test]
async fn overlapping_reports_each_intersecting_contract() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let (product, user) = seed(&svc).await;

    let in_window = svc
        .execute(create_cmd(product.id, user.id))
        .await
        .unwrap();

    let mut outside = create_cmd(product.id, user.id);
    outside.usage_date = date("2024-05-01").coerce();
    outside.period =
        Period::new(date("2024-05-01"), date("2024-05-10")).unwrap();
    svc.execute(outside).await.unwrap();

    let resolved = svc
        .execute(query::contracts::Overlapping {
            period: Period::new(date("2024-03-01"), date("2024-03-12"))
                .unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].contract.id, in_window.id);
    assert_eq!(resolved[0].user.id, user.id);
}

#[tokio::test]
async fn overlapping_fails_fast_on_dangling_references() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let (product, user) = seed(&svc).await;

    svc.execute(create_cmd(product.id, user.id)).await.unwrap();

    // Drop the renter behind the `Contract`'s back.
    let _ = svc.database().users.lock().unwrap().remove(&user.id);

    let err = svc
        .execute(query::contracts::Overlapping {
            period: Period::new(date("2024-03-01"), date("2024-03-31"))
                .unwrap(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        query::contracts::ExecutionError::UserNotExists(_),
    ));
}

#[tokio::test]
async fn create_user_rejects_occupied_email() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());

    let cmd = CreateUser {
        first_name: user::FirstName::new("Jordan").unwrap(),
        last_name: user::LastName::new("Meyer").unwrap(),
        postal_address: user::PostalAddress::new("12 Quai des Chartrons")
            .unwrap(),
        city: user::City::new("Bordeaux").unwrap(),
        birth_date: date("1990-06-15").coerce(),
        phone: user::Phone::new("555-123-4567").unwrap(),
        email: user::Email::new("jordan@example.com").unwrap(),
    };
    svc.execute(cmd.clone()).await.unwrap();

    let err = svc.execute(cmd).await.unwrap_err();
    assert!(matches!(
        err.as_ref(),
        create_user::ExecutionError::EmailOccupied(_),
    ));
}

#[tokio::test]
async fn agreement_requires_recorded_return() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let (product, user) = seed(&svc).await;

    let contract = svc
        .execute(create_cmd(product.id, user.id))
        .await
        .unwrap();

    let err = svc
        .execute(GenerateAgreement {
            contract_id: contract.id,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        generate_agreement::ExecutionError::NotRetrieved(_),
    ));
}

#[tokio::test]
async fn agreement_is_keyed_by_contract_and_regenerates_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let (product, user) = seed(&svc).await;

    let close = |created: &Contract| EditContract {
        id: created.id,
        product_id: created.product_id,
        user_id: created.user_id,
        quantity: created.quantity,
        rental_days: created.rental_days,
        state_before: created.state_before.clone(),
        state_after: Some(contract::Condition::new("good").unwrap()),
        usage_date: created.usage_date,
        retrieval_date: Some(date("2024-03-19").coerce()),
        period: Period::new(date("2024-03-10"), date("2024-03-19")).unwrap(),
    };

    // Two closed contracts of the very same renter.
    let first = svc.execute(create_cmd(product.id, user.id)).await.unwrap();
    svc.execute(close(&first)).await.unwrap();
    let second = svc.execute(create_cmd(product.id, user.id)).await.unwrap();
    svc.execute(close(&second)).await.unwrap();

    let first_doc = svc
        .execute(GenerateAgreement {
            contract_id: first.id,
        })
        .await
        .unwrap();
    let second_doc = svc
        .execute(GenerateAgreement {
            contract_id: second.id,
        })
        .await
        .unwrap();

    // Same renter, still two distinct documents.
    assert_ne!(first_doc.as_path(), second_doc.as_path());
    assert_eq!(
        first_doc.as_path().file_name().unwrap().to_str().unwrap(),
        format!("rental_agreement_{}.txt", first.id),
    );

    let text = std::fs::read_to_string(first_doc.as_path()).unwrap();
    assert!(text.contains("RENTAL AGREEMENT"));
    assert!(text.contains("Object: Excavator"));
    assert!(text.contains("Name: Jordan Meyer"));
    assert!(text.contains("State after: good"));
    assert!(text.contains("Retrieval date: 2024-03-19"));

    // Regenerating lands on the same path with the same bytes.
    let again = svc
        .execute(GenerateAgreement {
            contract_id: first.id,
        })
        .await
        .unwrap();
    assert_eq!(again.as_path(), first_doc.as_path());
    assert_eq!(std::fs::read_to_string(again.as_path()).unwrap(), text);
}
