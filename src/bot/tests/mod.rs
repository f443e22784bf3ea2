// Tests for the phase loop
