// Tests for in-game player handling
