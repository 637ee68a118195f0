use crate::recipe_repo::Recipe;
use crate::user_repo::{User, UserId};
use crate::{HealthCheck, Repos};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod ingredient_repo;
mod recipe_repo;
mod tag_repo;
mod user_repo;

/// Named items owned by a single user. Tags and ingredients are both kept this way.
struct Catalog {
    names: HashMap<i32, String>,
    user_items: HashMap<UserId, HashSet<i32>>,
    next_id: i32,
}

impl Catalog {
    fn new() -> Catalog {
        Catalog {
            names: HashMap::new(),
            user_items: HashMap::new(),
            next_id: 1,
        }
    }

    fn insert(&mut self, user: UserId, name: String) -> i32 {
        let id = self.next_id;
        self.next_id += 1;

        self.names.insert(id, name);
        self.user_items.entry(user).or_default().insert(id);
        id
    }

    fn owned_by(&self, user: UserId, id: i32) -> bool {
        self.user_items
            .get(&user)
            .map_or(false, |ids| ids.contains(&id))
    }

    fn name(&self, id: i32) -> Result<&str, anyhow::Error> {
        self.names
            .get(&id)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("Catalog is missing item {}", id))
    }

    /// Items of `user` ordered by name, descending.
    fn list(&self, user: UserId) -> Result<Vec<(i32, String)>, anyhow::Error> {
        let Some(ids) = self.user_items.get(&user) else {
            return Ok(Vec::new());
        };

        let mut items = ids
            .iter()
            .map(|id| Ok((*id, self.name(*id)?.to_owned())))
            .collect::<Result<Vec<_>, anyhow::Error>>()?;
        items.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
        Ok(items)
    }

    fn remove(&mut self, user: UserId, id: i32) -> Option<String> {
        let ids = self.user_items.get_mut(&user)?;
        if !ids.remove(&id) {
            return None;
        }
        self.names.remove(&id)
    }

    fn remove_user(&mut self, user: UserId) {
        if let Some(ids) = self.user_items.remove(&user) {
            for id in ids {
                self.names.remove(&id);
            }
        }
    }
}

struct State {
    users: HashMap<UserId, User>,
    next_user_id: UserId,
    tags: Catalog,
    ingredients: Catalog,
    recipes: HashMap<i32, Recipe>,
    user_recipes: HashMap<UserId, HashSet<i32>>,
    next_recipe_id: i32,
}

impl State {
    fn recipes_of(&self, user: UserId) -> impl Iterator<Item = &Recipe> {
        let recipes = &self.recipes;
        self.user_recipes
            .get(&user)
            .into_iter()
            .flatten()
            .filter_map(move |id| recipes.get(id))
    }

    fn recipes_of_mut(&mut self, user: UserId) -> impl Iterator<Item = &mut Recipe> {
        let ids = self.user_recipes.get(&user).cloned().unwrap_or_default();
        self.recipes
            .iter_mut()
            .filter(move |(id, _)| ids.contains(id))
            .map(|(_, recipe)| recipe)
    }
}

/// Keeps everything in process memory. Used when no database is configured and in tests.
pub struct MemRepo {
    state: RwLock<State>,
}

impl MemRepo {
    pub fn new() -> MemRepo {
        let state = State {
            users: HashMap::new(),
            next_user_id: 1,
            tags: Catalog::new(),
            ingredients: Catalog::new(),
            recipes: HashMap::new(),
            user_recipes: HashMap::new(),
            next_recipe_id: 1,
        };
        MemRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl Default for MemRepo {
    fn default() -> Self {
        MemRepo::new()
    }
}

#[async_trait]
impl HealthCheck for MemRepo {
    async fn check(&self) -> bool {
        self.read_lock().is_ok()
    }
}

pub fn create_repos() -> Repos {
    Repos::from_backend(Arc::new(MemRepo::new()))
}
