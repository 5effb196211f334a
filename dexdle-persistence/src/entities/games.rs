use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub puzzle_id: i32,
    pub won: Option<bool>,
    pub is_finished: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::daily_puzzles::Entity",
        from = "Column::PuzzleId",
        to = "super::daily_puzzles::Column::Id",
        on_delete = "Cascade"
    )]
    DailyPuzzles,
    #[sea_orm(has_many = "super::guesses::Entity")]
    Guesses,
}

impl Related<super::daily_puzzles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyPuzzles.def()
    }
}

impl Related<super::guesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guesses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
