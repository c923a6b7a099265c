//! [`Product`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Delete, Insert, Select, Update},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{product, Product},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Builds a [`Product`] out of the provided [`Row`].
fn from_row(row: &Row) -> Product {
    let currency = row.get("currency");
    Product {
        id: row.get("id"),
        object: row.get("object"),
        brand: row.get("brand"),
        model: row.get("model"),
        quantity: row.get("quantity"),
        description: row.get("description"),
        precautions: row.get("precautions"),
        price_per_day: Money {
            amount: row.get("price_per_day"),
            currency,
        },
        price_per_week: Money {
            amount: row.get("price_per_week"),
            currency,
        },
        deposit: Money {
            amount: row.get("deposit"),
            currency,
        },
        created_at: row.get("created_at"),
        deleted_at: row.get("deleted_at"),
    }
}

impl<IDs> Database<Select<By<HashMap<product::Id, Product>, IDs>>> for Postgres
where
    IDs: AsRef<[product::Id]>,
{
    type Ok = HashMap<product::Id, Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<product::Id, Product>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[product::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        // Removed `Product`s are resolved too: existing `Contract`s keep
        // referring to them.
        const SQL: &str = "\
            SELECT id, object, brand, model, \
                   quantity, description, precautions, \
                   price_per_day, price_per_week, deposit, currency, \
                   created_at, deleted_at \
            FROM products \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| (row.get("id"), from_row(row)))
            .collect())
    }
}

impl Database<Select<By<Option<Product>, product::Id>>> for Postgres {
    type Ok = Option<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Product>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        // This is the catalog view: removed `Product`s are not rentable.
        const SQL: &str = "\
            SELECT id, object, brand, model, \
                   quantity, description, precautions, \
                   price_per_day, price_per_week, deposit, currency, \
                   created_at, deleted_at \
            FROM products \
            WHERE id = $1::UUID \
              AND deleted_at IS NULL \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl Database<Select<By<Vec<Product>, ()>>> for Postgres {
    type Ok = Vec<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<Product>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, object, brand, model, \
                   quantity, description, precautions, \
                   price_per_day, price_per_week, deposit, currency, \
                   created_at, deleted_at \
            FROM products \
            WHERE deleted_at IS NULL \
            ORDER BY created_at, id";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl Database<Insert<Product>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(product): Insert<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(product))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Database<Update<Product>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(product): Update<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        let Product {
            id,
            object,
            brand,
            model,
            quantity,
            description,
            precautions,
            price_per_day,
            price_per_week,
            deposit,
            created_at,
            deleted_at,
        } = product;

        const SQL: &str = "\
            INSERT INTO products (\
                id, object, brand, model, \
                quantity, description, precautions, \
                price_per_day, price_per_week, deposit, currency, \
                created_at, deleted_at\
            ) \
            VALUES (\
                $1::UUID, \
                $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::INT4, $6::VARCHAR, $7::VARCHAR, \
                $8::NUMERIC, $9::NUMERIC, $10::NUMERIC, $11::INT2, \
                $12::TIMESTAMPTZ, $13::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET object = EXCLUDED.object, \
                brand = EXCLUDED.brand, \
                model = EXCLUDED.model, \
                quantity = EXCLUDED.quantity, \
                description = EXCLUDED.description, \
                precautions = EXCLUDED.precautions, \
                price_per_day = EXCLUDED.price_per_day, \
                price_per_week = EXCLUDED.price_per_week, \
                deposit = EXCLUDED.deposit, \
                currency = EXCLUDED.currency, \
                created_at = EXCLUDED.created_at, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[
                &id,
                &object,
                &brand,
                &model,
                &quantity,
                &description,
                &precautions,
                &price_per_day.amount,
                &price_per_week.amount,
                &deposit.amount,
                &price_per_day.currency,
                &created_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl Database<Delete<By<Product, product::Id>>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Product, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: product::Id = by.into_inner();

        const SQL: &str = "\
            UPDATE products \
            SET deleted_at = NOW() \
            WHERE id = $1::UUID \
              AND deleted_at IS NULL";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
