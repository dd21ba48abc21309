//! Tests for sprint budget.

#[cfg(test)]
mod tests {
    use crate::locomotion::sprint::SprintBudget;

    const TICK: f32 = 1.0 / 60.0;

    #[test]
    fn test_budget_drains_linearly_while_sprinting() {
        let mut budget = SprintBudget::new(2.0, 1.0, 1.0);

        let mut previous = budget.remaining();
        for _ in 0..30 {
            assert!(budget.advance(true, TICK));
            let step = previous - budget.remaining();
            assert!((step - TICK).abs() < 1e-5, "step = {}", step);
            previous = budget.remaining();
        }

        // 30 ticks = 0.5 sec
        assert!((budget.remaining() - 1.5).abs() < 1e-4);
        assert!((budget.fraction() - 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_budget_clamped_at_zero() {
        let mut budget = SprintBudget::new(0.1, 1.0, 1.0);

        for _ in 0..20 {
            budget.advance(true, TICK);
            assert!(budget.remaining() >= 0.0);
        }

        assert_eq!(budget.remaining(), 0.0);
        assert!(budget.is_exhausted());
        // Уже на нуле - изменений нет
        assert!(!budget.advance(true, TICK));
    }

    #[test]
    fn test_regeneration_waits_for_delay() {
        let mut budget = SprintBudget::new(2.0, 0.5, 1.0);
        budget.advance(true, 1.0);
        assert_eq!(budget.remaining(), 1.0);

        // Задержка 0.5 sec = 30 ticks без изменений
        for _ in 0..30 {
            assert!(!budget.advance(false, TICK));
        }
        assert_eq!(budget.remaining(), 1.0);

        // Дальше регенерация
        let mut regenerated = false;
        for _ in 0..5 {
            regenerated |= budget.advance(false, TICK);
        }
        assert!(regenerated);
        assert!(budget.remaining() > 1.0);
    }

    #[test]
    fn test_sprinting_resets_regeneration_delay() {
        let mut budget = SprintBudget::new(2.0, 1.0, 1.0);
        budget.advance(true, 0.5);
        budget.advance(false, 0.6);
        assert!((budget.delay_left() - 0.4).abs() < 1e-5);

        budget.advance(true, TICK);
        assert_eq!(budget.delay_left(), 1.0);
    }

    #[test]
    fn test_regeneration_clamped_at_max() {
        let mut budget = SprintBudget::new(1.0, 0.0, 10.0);
        budget.advance(true, 0.5);

        for _ in 0..10 {
            budget.advance(false, 0.1);
            assert!(budget.remaining() <= budget.max());
        }
        assert_eq!(budget.remaining(), 1.0);
        assert_eq!(budget.fraction(), 1.0);
    }

    #[test]
    fn test_full_budget_idle_reports_no_change() {
        let mut budget = SprintBudget::new(2.0, 1.0, 1.0);
        assert!(!budget.advance(false, TICK));
        assert_eq!(budget.fraction(), 1.0);
    }
}
