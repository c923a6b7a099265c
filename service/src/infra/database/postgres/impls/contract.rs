//! [`Contract`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Select, Update},
    Money, Period,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{contract, Contract},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Builds a [`Contract`] out of the provided [`Row`].
fn from_row(row: &Row) -> Contract {
    Contract {
        id: row.get("id"),
        product_id: row.get("product_id"),
        user_id: row.get("user_id"),
        quantity: row.get("quantity"),
        rental_days: row.get("rental_days"),
        total_amount: Money {
            amount: row.get("total_amount"),
            currency: row.get("currency"),
        },
        state_before: row.get("state_before"),
        state_after: row.get("state_after"),
        usage_date: row.get("usage_date"),
        retrieval_date: row.get("retrieval_date"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        created_at: row.get("created_at"),
    }
}

impl<IDs> Database<Select<By<HashMap<contract::Id, Contract>, IDs>>>
    for Postgres
where
    IDs: AsRef<[contract::Id]>,
{
    type Ok = HashMap<contract::Id, Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<contract::Id, Contract>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[contract::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, product_id, user_id, \
                   quantity, rental_days, \
                   total_amount, currency, \
                   state_before, state_after, \
                   usage_date, retrieval_date, \
                   start_date, end_date, \
                   created_at \
            FROM contracts \
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

impl Database<Select<By<Option<Contract>, contract::Id>>> for Postgres {
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::<HashMap<_, Contract>, _>::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl Database<Select<By<Vec<Contract>, ()>>> for Postgres {
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<Contract>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, product_id, user_id, \
                   quantity, rental_days, \
                   total_amount, currency, \
                   state_before, state_after, \
                   usage_date, retrieval_date, \
                   start_date, end_date, \
                   created_at \
            FROM contracts \
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

impl Database<Select<By<Vec<Contract>, Period>>> for Postgres {
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, Period>>,
    ) -> Result<Self::Ok, Self::Err> {
        let period = by.into_inner();

        // A `Contract` intersects the window if it starts inside it, ends
        // inside it, or covers it entirely. All the bounds are inclusive.
        const SQL: &str = "\
            SELECT id, product_id, user_id, \
                   quantity, rental_days, \
                   total_amount, currency, \
                   state_before, state_after, \
                   usage_date, retrieval_date, \
                   start_date, end_date, \
                   created_at \
            FROM contracts \
            WHERE (start_date BETWEEN $1::DATE AND $2::DATE) \
               OR (end_date BETWEEN $1::DATE AND $2::DATE) \
               OR (start_date <= $1::DATE AND end_date >= $2::DATE) \
            ORDER BY start_date, id";
        Ok(self
            .query(SQL, &[&period.start(), &period.end()])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl Database<Insert<Contract>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(contract))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Database<Update<Contract>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let Contract {
            id,
            product_id,
            user_id,
            quantity,
            rental_days,
            total_amount,
            state_before,
            state_after,
            usage_date,
            retrieval_date,
            start_date,
            end_date,
            created_at,
        } = contract;

        const SQL: &str = "\
            INSERT INTO contracts (\
                id, product_id, user_id, \
                quantity, rental_days, \
                total_amount, currency, \
                state_before, state_after, \
                usage_date, retrieval_date, \
                start_date, end_date, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::INT4, $5::INT4, \
                $6::NUMERIC, $7::INT2, \
                $8::VARCHAR, $9::VARCHAR, \
                $10::DATE, $11::DATE, \
                $12::DATE, $13::DATE, \
                $14::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET product_id = EXCLUDED.product_id, \
                user_id = EXCLUDED.user_id, \
                quantity = EXCLUDED.quantity, \
                rental_days = EXCLUDED.rental_days, \
                total_amount = EXCLUDED.total_amount, \
                currency = EXCLUDED.currency, \
                state_before = EXCLUDED.state_before, \
                state_after = EXCLUDED.state_after, \
                usage_date = EXCLUDED.usage_date, \
                retrieval_date = EXCLUDED.retrieval_date, \
                start_date = EXCLUDED.start_date, \
                end_date = EXCLUDED.end_date, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &product_id,
                &user_id,
                &quantity,
                &rental_days,
                &total_amount.amount,
                &total_amount.currency,
                &state_before,
                &state_after,
                &usage_date,
                &retrieval_date,
                &start_date,
                &end_date,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
