//! [`RoomType`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select},
    Date,
};
use itertools::{izip, Itertools as _};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        room_type::{self, price, Price},
        Room, RoomType,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Builds SQL selecting [`RoomType`]s matching the provided `filter`, along
/// with their [`Room`]s and [`Price`]s effective on the `$1::DATE`.
///
/// Prices of each [`RoomType`] are ordered by their [`price::Kind`], the
/// latest `effective_from` going first.
fn select_sql(filter: &str) -> String {
    format!(
        "\
        SELECT rt.id, rt.name, rt.code, rt.description, rt.created_at, \
               p.ids AS price_ids, p.kinds AS price_kinds, \
               p.weekdays AS price_weekdays, p.weekends AS price_weekends, \
               p.promotion_names AS price_promotion_names, \
               p.effective_froms AS price_effective_froms, \
               p.effective_tos AS price_effective_tos, \
               r.ids AS room_ids, r.names AS room_names \
        FROM room_types AS rt \
        LEFT JOIN LATERAL (\
            SELECT array_agg(id ORDER BY kind, effective_from DESC, id) \
                       AS ids, \
                   array_agg(kind ORDER BY kind, effective_from DESC, id) \
                       AS kinds, \
                   array_agg(weekday ORDER BY kind, effective_from DESC, id) \
                       AS weekdays, \
                   array_agg(weekend ORDER BY kind, effective_from DESC, id) \
                       AS weekends, \
                   array_agg(promotion_name \
                             ORDER BY kind, effective_from DESC, id) \
                       AS promotion_names, \
                   array_agg(effective_from \
                             ORDER BY kind, effective_from DESC, id) \
                       AS effective_froms, \
                   array_agg(effective_to \
                             ORDER BY kind, effective_from DESC, id) \
                       AS effective_tos \
            FROM room_prices \
            WHERE room_type_id = rt.id \
              AND effective_from <= $1::DATE \
              AND (effective_to IS NULL OR effective_to >= $1::DATE)\
        ) AS p ON TRUE \
        LEFT JOIN LATERAL (\
            SELECT array_agg(id ORDER BY length(name), name) AS ids, \
                   array_agg(name ORDER BY length(name), name) AS names \
            FROM rooms \
            WHERE room_type_id = rt.id\
        ) AS r ON TRUE \
        {filter} \
        ORDER BY rt.name, rt.id",
    )
}

/// Reads a [`RoomType`] from the provided [`Row`] selected with
/// [`select_sql()`].
fn from_row(row: &Row) -> RoomType {
    // Aggregating no rows results in `NULL` arrays.
    let prices = izip!(
        row.get::<_, Option<Vec<price::Id>>>("price_ids")
            .unwrap_or_default(),
        row.get::<_, Option<Vec<price::Kind>>>("price_kinds")
            .unwrap_or_default(),
        row.get::<_, Option<Vec<_>>>("price_weekdays").unwrap_or_default(),
        row.get::<_, Option<Vec<_>>>("price_weekends").unwrap_or_default(),
        row.get::<_, Option<Vec<_>>>("price_promotion_names")
            .unwrap_or_default(),
        row.get::<_, Option<Vec<_>>>("price_effective_froms")
            .unwrap_or_default(),
        row.get::<_, Option<Vec<_>>>("price_effective_tos")
            .unwrap_or_default(),
    )
    .map(
        |(
            id,
            kind,
            weekday,
            weekend,
            promotion_name,
            effective_from,
            effective_to,
        )| Price {
            id,
            kind,
            weekday,
            weekend,
            promotion_name,
            effective_from,
            effective_to,
        },
    )
    .collect();

    let rooms = izip!(
        row.get::<_, Option<Vec<_>>>("room_ids").unwrap_or_default(),
        row.get::<_, Option<Vec<_>>>("room_names").unwrap_or_default(),
    )
    .map(|(id, name)| Room { id, name })
    .collect();

    RoomType {
        id: row.get("id"),
        name: row.get("name"),
        code: row.get("code"),
        description: row.get("description"),
        prices,
        rooms,
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Vec<RoomType>, price::EffectiveOn>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<RoomType>, price::EffectiveOn>>,
    ) -> Result<Self::Ok, Self::Err> {
        let price::EffectiveOn(on) = by.into_inner();

        Ok(self
            .query(select_sql("").as_str(), &[&on])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Option<RoomType>, room_type::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RoomType>, room_type::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        Ok(self
            .query_opt(
                select_sql("WHERE rt.id = $2::UUID").as_str(),
                &[&Date::today(), &id],
            )
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Option<RoomType>, &room_type::Code>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RoomType>, &room_type::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();

        Ok(self
            .query_opt(
                select_sql("WHERE rt.code = $2::VARCHAR").as_str(),
                &[&Date::today(), code],
            )
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Insert<RoomType>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(room_type): Insert<RoomType>,
    ) -> Result<Self::Ok, Self::Err> {
        let RoomType {
            id,
            name,
            code,
            description,
            prices,
            rooms,
            created_at,
        } = room_type;

        const SQL: &str = "\
            INSERT INTO room_types (id, name, code, description, created_at) \
            VALUES (\
                $1::UUID, \
                $2::VARCHAR, $3::VARCHAR, $4::TEXT, \
                $5::TIMESTAMPTZ\
            )";
        self.exec(SQL, &[&id, &name, &code, &description, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        if !rooms.is_empty() {
            let (ids, names): (Vec<_>, Vec<_>) =
                rooms.into_iter().map(|r| (r.id, r.name)).unzip();

            const SQL: &str = "\
                INSERT INTO rooms (id, room_type_id, name) \
                SELECT room_id, $1::UUID, room_name \
                FROM unnest($2::UUID[], $3::VARCHAR[]) \
                     AS r(room_id, room_name)";
            self.exec(SQL, &[&id, &ids, &names])
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        insert_prices(&**self, id, prices).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<(room_type::Id, Price)>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert((id, price)): Insert<(room_type::Id, Price)>,
    ) -> Result<Self::Ok, Self::Err> {
        insert_prices(&**self, id, vec![price])
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Inserts the provided [`Price`]s of the [`RoomType`] with the provided ID.
async fn insert_prices<C: Connection>(
    conn: &C,
    room_type_id: room_type::Id,
    prices: Vec<Price>,
) -> Result<(), Traced<database::Error>> {
    if prices.is_empty() {
        return Ok(());
    }

    let (ids, kinds, weekdays, weekends, promotion_names, froms, tos): (
        Vec<_>,
        Vec<_>,
        Vec<_>,
        Vec<_>,
        Vec<_>,
        Vec<_>,
        Vec<_>,
    ) = prices
        .into_iter()
        .map(|p| {
            (
                p.id,
                p.kind,
                p.weekday,
                p.weekend,
                p.promotion_name,
                p.effective_from,
                p.effective_to,
            )
        })
        .multiunzip();

    const SQL: &str = "\
        INSERT INTO room_prices (\
            id, room_type_id, kind, weekday, weekend, \
            promotion_name, effective_from, effective_to\
        ) \
        SELECT price_id, $1::UUID, kind, weekday, weekend, \
               promotion_name, effective_from, effective_to \
        FROM unnest(\
            $2::UUID[], $3::INT2[], $4::INT4[], $5::INT4[], \
            $6::VARCHAR[], $7::DATE[], $8::DATE[]\
        ) AS p(\
            price_id, kind, weekday, weekend, \
            promotion_name, effective_from, effective_to\
        )";
    conn.exec(
        SQL,
        &[
            &room_type_id,
            &ids,
            &kinds,
            &weekdays,
            &weekends,
            &promotion_names,
            &froms,
            &tos,
        ],
    )
    .await
    .map_err(tracerr::wrap!())
    .map(drop)
}
