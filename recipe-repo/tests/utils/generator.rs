use fake::faker::lorem::en::Words;
use fake::Fake;
use rand::seq::SliceRandom;
use recipe_repo::recipe_repo::NewRecipe;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

trait Generator<T> {
    fn gen(&mut self) -> T;
}

struct Predefined<T> {
    values: Vec<T>,
    current_pos: usize,
}

impl<T> Predefined<T> {
    fn boxed(values: Vec<T>) -> Box<Predefined<T>> {
        Box::new(Predefined {
            values,
            current_pos: 0,
        })
    }
}

impl<T: Clone> Generator<T> for Predefined<T> {
    fn gen(&mut self) -> T {
        let v = self.values[self.current_pos].clone();
        self.current_pos += 1;
        v
    }
}

struct RandomSample<T> {
    values: Vec<T>,
}

impl<T> RandomSample<T> {
    fn boxed(values: Vec<T>) -> Box<RandomSample<T>> {
        Box::new(RandomSample { values })
    }
}

impl<T: Clone> Generator<T> for RandomSample<T> {
    fn gen(&mut self) -> T {
        self.values.choose(&mut rand::thread_rng()).unwrap().clone()
    }
}

struct FakeTitle;

impl Generator<String> for FakeTitle {
    fn gen(&mut self) -> String {
        let words: Vec<String> = Words(1..4).fake();
        words.join(" ")
    }
}

struct FakeMinutes;

impl Generator<i32> for FakeMinutes {
    fn gen(&mut self) -> i32 {
        (1..240).fake()
    }
}

/// Prices in the range a `NUMERIC(5, 2)` column holds.
struct FakePrice;

impl Generator<Decimal> for FakePrice {
    fn gen(&mut self) -> Decimal {
        Decimal::new((0..100_000).fake(), 2)
    }
}

struct NoLinks;

impl Generator<BTreeSet<i32>> for NoLinks {
    fn gen(&mut self) -> BTreeSet<i32> {
        BTreeSet::new()
    }
}

#[allow(dead_code)]
pub struct NewRecipeGenerator {
    title_gen: Box<dyn Generator<String>>,
    time_gen: Box<dyn Generator<i32>>,
    price_gen: Box<dyn Generator<Decimal>>,
    link_gen: Box<dyn Generator<String>>,
    tag_gen: Box<dyn Generator<BTreeSet<i32>>>,
    ingredient_gen: Box<dyn Generator<BTreeSet<i32>>>,
}

#[allow(dead_code)]
impl NewRecipeGenerator {
    pub fn with_titles(mut self, titles: Vec<&str>) -> NewRecipeGenerator {
        let titles = titles.into_iter().map(|s| s.to_string()).collect();
        self.title_gen = Predefined::boxed(titles);
        self
    }

    pub fn with_tags(mut self, tags: Vec<Vec<i32>>) -> NewRecipeGenerator {
        let tags = tags
            .into_iter()
            .map(|ids| ids.into_iter().collect())
            .collect();
        self.tag_gen = Predefined::boxed(tags);
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Vec<i32>>) -> NewRecipeGenerator {
        let ingredients = ingredients
            .into_iter()
            .map(|ids| ids.into_iter().collect())
            .collect();
        self.ingredient_gen = Predefined::boxed(ingredients);
        self
    }

    pub fn generate(&mut self) -> NewRecipe {
        NewRecipe::new(
            self.title_gen.gen(),
            self.time_gen.gen(),
            self.price_gen.gen(),
            self.link_gen.gen(),
            self.tag_gen.gen(),
            self.ingredient_gen.gen(),
        )
    }

    pub fn generate_many(&mut self, count: usize) -> Vec<NewRecipe> {
        let mut vec = Vec::with_capacity(count);
        for _ in 0..count {
            vec.push(self.generate())
        }
        vec
    }
}

impl Default for NewRecipeGenerator {
    fn default() -> Self {
        NewRecipeGenerator {
            title_gen: Box::new(FakeTitle),
            time_gen: Box::new(FakeMinutes),
            price_gen: Box::new(FakePrice),
            link_gen: RandomSample::boxed(vec![
                String::new(),
                "https://example.com/recipes/pancakes".to_string(),
                "https://example.com/recipes/curry".to_string(),
            ]),
            tag_gen: Box::new(NoLinks),
            ingredient_gen: Box::new(NoLinks),
        }
    }
}
