//! Synthetic customer population.
//!
//! Every attribute is an independent draw from its own weight table,
//! in fixed order: city, age group, gender, tenure, tier, persona,
//! preferred method. Users are never mutated after creation.

use crate::{
    config::SynthConfig,
    error::{SynthError, SynthResult},
    rng::SynthRng,
    types::UserId,
    weights::WeightTable,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: UserId,
    pub city: String,
    pub age_group: String,
    pub gender: String,
    pub account_tenure: String,
    pub customer_tier: String,
    pub spending_persona: String,
    pub preferred_method: String,
}

/// Users in creation order, with an id index.
#[derive(Debug, Clone, Default)]
pub struct Population {
    users: Vec<User>,
    index: HashMap<UserId, usize>,
}

impl Population {
    pub fn from_users(users: Vec<User>) -> Self {
        let index = users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.user_id.clone(), i))
            .collect();
        Self { users, index }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn into_users(self) -> Vec<User> {
        self.users
    }

    pub fn get(&self, user_id: &str) -> Option<&User> {
        self.index.get(user_id).map(|i| &self.users[*i])
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Uniform pick. One draw.
    pub fn pick(&self, rng: &mut SynthRng) -> Option<&User> {
        rng.pick(&self.users)
    }
}

pub fn user_id(ordinal: usize) -> UserId {
    format!("USR{ordinal:05}")
}

pub fn generate_population(config: &SynthConfig, rng: &mut SynthRng) -> SynthResult<Population> {
    let n = config.population_size;
    let tables = &config.population;
    let mut users = Vec::with_capacity(n);

    for ordinal in 1..=n {
        let user = User {
            user_id: user_id(ordinal),
            city: draw("city", &tables.city, rng)?,
            age_group: draw("age_group", &tables.age_group, rng)?,
            gender: draw("gender", &tables.gender, rng)?,
            account_tenure: draw("account_tenure", &tables.account_tenure, rng)?,
            customer_tier: draw("customer_tier", &tables.customer_tier, rng)?,
            spending_persona: draw("spending_persona", &tables.spending_persona, rng)?,
            preferred_method: draw("preferred_method", &tables.preferred_method, rng)?,
        };
        users.push(user);
    }

    log::info!("population: generated {n} users on stream '{}'", rng.name);
    Ok(Population::from_users(users))
}

fn draw(field: &str, table: &WeightTable, rng: &mut SynthRng) -> SynthResult<String> {
    table
        .choose(rng)
        .map(str::to_string)
        .ok_or_else(|| SynthError::config(format!("population.{field} has no positive weight")))
}
